//! Testing utilities for tuneshelf
//!
//! This module provides fixture helpers and `MemoryStore`, an in-memory
//! [`MetadataStore`] that lets batch operations run against plain files
//! without real tag data.
//!
//! Only available when compiled with `cfg(test)`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::tags::{MetadataStore, TagError, TagKey, TagMap, Track};

/// Create an empty file, creating parent directories as needed
///
/// # Panics
/// Panics if the file cannot be created.
pub fn touch(path: &Path) {
    write_file(path, b"");
}

/// Create a file with the given content, creating parent directories as needed
///
/// # Panics
/// Panics if the file cannot be written.
pub fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write test file");
}

/// One ISO BMFF box
fn atom(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let size = u32::try_from(payload.len() + 8).expect("test atom too large");
    let mut out = size.to_be_bytes().to_vec();
    out.extend_from_slice(name);
    out.extend_from_slice(payload);
    out
}

fn full_atom(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut body = vec![0u8; 4];
    body.extend_from_slice(payload);
    atom(name, &body)
}

fn ilst_text(name: &[u8; 4], value: &str) -> Vec<u8> {
    // data atom: type 1 (UTF-8), locale 0
    let mut data = 1u32.to_be_bytes().to_vec();
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(value.as_bytes());
    atom(name, &atom(b"data", &data))
}

/// An audio-less M4A whose iTunes item list holds `artist` and `album`
pub fn m4a(artist: &str, album: &str) -> Vec<u8> {
    let mut ftyp = b"M4A ".to_vec();
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"M4A isom");

    let mut mvhd = Vec::new();
    mvhd.extend_from_slice(&[0u8; 8]);
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&0u32.to_be_bytes());
    mvhd.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    mvhd.extend_from_slice(&0x0100u16.to_be_bytes());
    mvhd.extend_from_slice(&[0u8; 10]);
    for row in [[0x0001_0000u32, 0, 0], [0, 0x0001_0000, 0], [0, 0, 0x4000_0000]] {
        for cell in row {
            mvhd.extend_from_slice(&cell.to_be_bytes());
        }
    }
    mvhd.extend_from_slice(&[0u8; 24]);
    mvhd.extend_from_slice(&1u32.to_be_bytes());

    let mut hdlr = 0u32.to_be_bytes().to_vec();
    hdlr.extend_from_slice(b"mdirappl");
    hdlr.extend_from_slice(&[0u8; 9]);

    let mut items = ilst_text(&[0xA9, b'A', b'R', b'T'], artist);
    items.extend(ilst_text(&[0xA9, b'a', b'l', b'b'], album));

    let mut meta = full_atom(b"hdlr", &hdlr);
    meta.extend(atom(b"ilst", &items));

    let mut moov = full_atom(b"mvhd", &mvhd);
    moov.extend(atom(b"udta", &full_atom(b"meta", &meta)));

    let mut file = atom(b"ftyp", &ftyp);
    file.extend(atom(b"moov", &moov));
    file.extend(atom(b"mdat", &[]));
    file
}

/// A FLAC stream with only its STREAMINFO block
pub fn flac() -> Vec<u8> {
    let mut file = b"fLaC".to_vec();
    // last-block flag, type 0, length 34
    file.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    file.extend_from_slice(&4096u16.to_be_bytes());
    file.extend_from_slice(&4096u16.to_be_bytes());
    file.extend_from_slice(&[0u8; 6]);
    // 44100 Hz, 2 channels, 16 bits, 0 samples
    let packed: u64 = (44_100 << 44) | (1 << 41) | (15 << 36);
    file.extend_from_slice(&packed.to_be_bytes());
    file.extend_from_slice(&[0u8; 16]);
    file
}

/// Build a tag map from `(key, value)` pairs
///
/// # Panics
/// Panics if a value is rejected by its key.
pub fn tag_map(pairs: &[(TagKey, &str)]) -> TagMap {
    let mut map = TagMap::new();
    for (key, value) in pairs {
        map.set(*key, *value).expect("invalid test tag value");
    }
    map
}

/// In-memory metadata store keyed by file name.
///
/// Keying by name instead of full path means tags follow a file when an
/// operation moves it. Files must still exist on disk to be opened.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tags: RefCell<HashMap<String, TagMap>>,
    corrupt: HashSet<String>,
    read_only: HashSet<String>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register tags for a file name
    #[must_use]
    pub fn with(self, name: &str, tags: TagMap) -> Self {
        self.tags.borrow_mut().insert(name.to_string(), tags);
        self
    }

    /// Make `open` fail for a file name
    #[must_use]
    pub fn with_corrupt(mut self, name: &str) -> Self {
        self.corrupt.insert(name.to_string());
        self
    }

    /// Make `save` fail for a file name
    #[must_use]
    pub fn with_read_only(mut self, name: &str) -> Self {
        self.read_only.insert(name.to_string());
        self
    }

    /// Current tags for a file name
    #[must_use]
    pub fn tags_of(&self, name: &str) -> Option<TagMap> {
        self.tags.borrow().get(name).cloned()
    }

    /// Number of successful saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }

    fn name_of(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl MetadataStore for MemoryStore {
    fn open(&self, path: &Path) -> Result<Track, TagError> {
        let name = Self::name_of(path);
        if self.corrupt.contains(&name) || !path.is_file() {
            return Err(TagError::Read {
                path: path.to_path_buf(),
                reason: "corrupt test file".to_string(),
            });
        }
        let tags = self.tags.borrow().get(&name).cloned().unwrap_or_default();
        Ok(Track::new(path.to_path_buf(), tags))
    }

    fn save(&self, track: &Track) -> Result<(), TagError> {
        let name = Self::name_of(track.path());
        if self.read_only.contains(&name) {
            return Err(TagError::Write {
                path: track.path().to_path_buf(),
                reason: "read-only test file".to_string(),
            });
        }
        self.tags.borrow_mut().insert(name, track.tags().clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.mp3");
        touch(&path);

        let store = MemoryStore::new().with("x.mp3", tag_map(&[(TagKey::Artist, "Blur")]));
        let mut track = store.open(&path).unwrap();
        assert_eq!(track.get(TagKey::Artist), Some("Blur"));

        track.set(TagKey::Album, "Parklife").unwrap();
        store.save(&track).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(
            store.tags_of("x.mp3").unwrap().get(TagKey::Album),
            Some("Parklife")
        );
    }

    #[test]
    fn test_memory_store_failures() {
        let dir = TempDir::new().unwrap();
        let bad = dir.path().join("bad.mp3");
        let locked = dir.path().join("locked.mp3");
        touch(&bad);
        touch(&locked);

        let store = MemoryStore::new()
            .with_corrupt("bad.mp3")
            .with_read_only("locked.mp3");
        assert!(store.open(&bad).is_err());
        let track = store.open(&locked).unwrap();
        assert!(store.save(&track).is_err());
        assert!(store.open(&dir.path().join("missing.mp3")).is_err());
    }
}
