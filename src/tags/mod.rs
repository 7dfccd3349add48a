//! Tag access
//!
//! Public API:
//! - [`TagKey`]: the closed key schema, with its sort-variant and vendor families
//! - [`TagMap`] / [`Track`]: a file's tags in memory
//! - [`MetadataStore`]: read/write capability implemented by [`Id3Store`]
//!   (ID3v2 in MP3), [`LoftyStore`] (MP4, FLAC, Ogg) and [`AudioStore`], which
//!   picks between them by extension

mod audio_store;
mod error;
mod id3_store;
mod key;
mod lofty_store;
mod map;
mod store;
mod util;

pub use audio_store::AudioStore;
pub use error::TagError;
pub use id3_store::Id3Store;
pub use key::{FrameSlot, TagGroup, TagKey, VENDOR_MARKER, ValueKind};
pub use lofty_store::LoftyStore;
pub use map::{TagMap, Track};
pub use store::MetadataStore;
