//! [`MetadataStore`] for MP4, FLAC and Ogg files, backed by `lofty`.
//!
//! Keys are mapped onto lofty's format-neutral [`ItemKey`]s. Keys without an
//! item in the generic tag (mostly the vendor identifiers) are not readable
//! here, and setting one is reported as a write error.

use std::path::Path;

use lofty::config::{ParseOptions, ParsingMode, WriteOptions};
use lofty::file::{TaggedFile, TaggedFileExt};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use super::{MetadataStore, TagError, TagKey, TagMap, Track};

const EXTENSIONS: &[&str] = &["m4a", "mp4", "flac", "ogg", "opus"];

/// Reads and writes the native tag of MP4, FLAC and Ogg containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyStore;

impl LoftyStore {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether `path` has an extension this store handles
    #[must_use]
    pub fn supports(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
    }
}

fn parse_options(read_cover_art: bool) -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .read_cover_art(read_cover_art)
        .parsing_mode(ParsingMode::BestAttempt)
}

fn read_file(path: &Path, read_cover_art: bool) -> Result<TaggedFile, String> {
    Probe::open(path)
        .map_err(|e| e.to_string())?
        .options(parse_options(read_cover_art))
        .read()
        .map_err(|e| e.to_string())
}

/// Item holding a key's value; number pairs also use [`total_item`].
const fn item_key(key: TagKey) -> Option<ItemKey> {
    Some(match key {
        TagKey::Title => ItemKey::TrackTitle,
        TagKey::Artist => ItemKey::TrackArtist,
        TagKey::TrackNumber => ItemKey::TrackNumber,
        TagKey::Album => ItemKey::AlbumTitle,
        TagKey::Genre => ItemKey::Genre,
        TagKey::AlbumArtist => ItemKey::AlbumArtist,
        TagKey::Composer => ItemKey::Composer,
        TagKey::Date => ItemKey::RecordingDate,
        TagKey::OriginalDate => ItemKey::OriginalReleaseDate,
        TagKey::DiscNumber => ItemKey::DiscNumber,
        TagKey::DiscSubtitle => ItemKey::SetSubtitle,
        TagKey::Bpm => ItemKey::IntegerBpm,
        TagKey::Compilation => ItemKey::FlagCompilation,
        TagKey::Copyright => ItemKey::CopyrightMessage,
        TagKey::EncodedBy => ItemKey::EncodedBy,
        TagKey::Lyricist => ItemKey::Lyricist,
        TagKey::Mood => ItemKey::Mood,
        TagKey::Grouping => ItemKey::ContentGroup,
        TagKey::Version => ItemKey::TrackSubtitle,
        TagKey::Conductor => ItemKey::Conductor,
        TagKey::Arranger => ItemKey::Arranger,
        TagKey::Organization => ItemKey::Label,
        TagKey::Language => ItemKey::Language,
        TagKey::Isrc => ItemKey::Isrc,
        TagKey::AlbumArtistSort => ItemKey::AlbumArtistSortOrder,
        TagKey::AlbumSort => ItemKey::AlbumTitleSortOrder,
        TagKey::ComposerSort => ItemKey::ComposerSortOrder,
        TagKey::ArtistSort => ItemKey::TrackArtistSortOrder,
        TagKey::TitleSort => ItemKey::TrackTitleSortOrder,
        TagKey::Barcode => ItemKey::Barcode,
        TagKey::CatalogNumber => ItemKey::CatalogNumber,
        TagKey::MusicBrainzArtistId => ItemKey::MusicBrainzArtistId,
        TagKey::MusicBrainzAlbumId => ItemKey::MusicBrainzReleaseId,
        TagKey::MusicBrainzAlbumArtistId => ItemKey::MusicBrainzReleaseArtistId,
        TagKey::MusicBrainzReleaseGroupId => ItemKey::MusicBrainzReleaseGroupId,
        _ => return None,
    })
}

/// Item some formats use instead of the primary one
const fn fallback_item(key: TagKey) -> Option<ItemKey> {
    match key {
        TagKey::Date => Some(ItemKey::Year),
        TagKey::Bpm => Some(ItemKey::Bpm),
        _ => None,
    }
}

/// Formats store "N/M" as two items
const fn total_item(key: TagKey) -> Option<ItemKey> {
    match key {
        TagKey::TrackNumber => Some(ItemKey::TrackTotal),
        TagKey::DiscNumber => Some(ItemKey::DiscTotal),
        _ => None,
    }
}

fn read_value(tag: &Tag, key: TagKey) -> Option<String> {
    let item = item_key(key)?;
    let value = tag
        .get_string(item)
        .or_else(|| fallback_item(key).and_then(|fallback| tag.get_string(fallback)))?;
    let total = total_item(key).and_then(|total| tag.get_string(total));
    Some(match total {
        Some(total) => format!("{value}/{total}"),
        None => value.to_string(),
    })
}

fn map_from_tag(tag: &Tag) -> TagMap {
    let mut map = TagMap::new();
    for key in TagKey::ALL {
        if let Some(value) = read_value(tag, *key) {
            map.insert_raw(*key, value);
        }
    }
    map
}

fn write_value(tag: &mut Tag, key: TagKey, item: ItemKey, value: Option<&str>) {
    tag.remove_key(item.clone());
    if let Some(fallback) = fallback_item(key) {
        tag.remove_key(fallback);
    }
    let total = total_item(key);
    if let Some(total) = &total {
        tag.remove_key(total.clone());
    }
    let Some(value) = value else {
        return;
    };

    match (total, value.split_once('/')) {
        (Some(total), Some((number, count))) => {
            tag.insert_text(item, number.trim().to_string());
            tag.insert_text(total, count.trim().to_string());
        }
        _ => {
            tag.insert_text(item, value.to_string());
        }
    }
}

impl MetadataStore for LoftyStore {
    fn open(&self, path: &Path) -> Result<Track, TagError> {
        if !Self::supports(path) {
            return Err(TagError::Unsupported {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(TagError::Read {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let tagged_file = read_file(path, false).map_err(|reason| TagError::Read {
            path: path.to_path_buf(),
            reason,
        })?;
        let tags = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag())
            .map(map_from_tag)
            .unwrap_or_default();
        Ok(Track::new(path.to_path_buf(), tags))
    }

    fn save(&self, track: &Track) -> Result<(), TagError> {
        let path = track.path();
        let write_err = |reason: String| TagError::Write {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(description) = track.tags().custom().keys().next() {
            return Err(write_err(format!("no field for custom tag '{description}'")));
        }

        // Cover art is read so that pictures survive the rewrite.
        let mut tagged_file = read_file(path, true).map_err(write_err)?;
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let Some(tag) = tagged_file.tag_mut(tag_type) else {
            return Err(write_err(format!("{tag_type:?} tags are not supported")));
        };

        let on_disk = map_from_tag(tag);
        let mut changed = false;
        for key in TagKey::ALL {
            let value = track.get(*key);
            if value == on_disk.get(*key) {
                continue;
            }
            let Some(item) = item_key(*key) else {
                return Err(write_err(format!("no field for {key} in this format")));
            };
            write_value(tag, *key, item, value);
            changed = true;
        }

        if changed {
            tag.save_to_path(path, WriteOptions::default())
                .map_err(|e| write_err(e.to_string()))?;
            tracing::debug!(path = %path.display(), "tags written");
        }
        Ok(())
    }
}
