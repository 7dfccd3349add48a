//! Store that picks the tag format from the file extension.

use std::path::Path;

use super::{Id3Store, LoftyStore, MetadataStore, TagError, Track};

/// Routes `.mp3` files to [`Id3Store`] and MP4/FLAC/Ogg files to
/// [`LoftyStore`]. Anything else is `TagError::Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioStore {
    id3: Id3Store,
    lofty: LoftyStore,
}

impl AudioStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id3: Id3Store::new(),
            lofty: LoftyStore::new(),
        }
    }

    /// Whether some format store handles `path`
    #[must_use]
    pub fn supports(path: &Path) -> bool {
        Id3Store::supports(path) || LoftyStore::supports(path)
    }

    fn store_for(&self, path: &Path) -> Result<&dyn MetadataStore, TagError> {
        if Id3Store::supports(path) {
            Ok(&self.id3)
        } else if LoftyStore::supports(path) {
            Ok(&self.lofty)
        } else {
            Err(TagError::Unsupported {
                path: path.to_path_buf(),
            })
        }
    }
}

impl MetadataStore for AudioStore {
    fn open(&self, path: &Path) -> Result<Track, TagError> {
        self.store_for(path)?.open(path)
    }

    fn save(&self, track: &Track) -> Result<(), TagError> {
        let store = self.store_for(track.path()).map_err(|_| TagError::Write {
            path: track.path().to_path_buf(),
            reason: "no tag format for this file type".to_string(),
        })?;
        store.save(track)
    }
}
