//! ID3v2 implementation of [`MetadataStore`].

use std::path::Path;

use id3::frame::{Content, ExtendedText};
use id3::{ErrorKind, Frame, Tag, TagLike, Version};

use super::util::first_value;
use super::{FrameSlot, MetadataStore, TagError, TagKey, TagMap, Track};

/// Reads and writes ID3v2 tags in MP3 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3Store;

impl Id3Store {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether `path` looks like a container this store understands
    #[must_use]
    pub fn supports(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
    }
}

impl MetadataStore for Id3Store {
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

        let tags = match Tag::read_from_path(path) {
            Ok(tag) => map_from_tag(&tag),
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => TagMap::new(),
            Err(e) => {
                return Err(TagError::Read {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };
        Ok(Track::new(path.to_path_buf(), tags))
    }

    fn save(&self, track: &Track) -> Result<(), TagError> {
        let path = track.path();
        let write_err = |reason: String| TagError::Write {
            path: path.to_path_buf(),
            reason,
        };

        // Start from the tag on disk so frames we do not manage (art, comments) survive.
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
            Err(e) => return Err(write_err(e.to_string())),
        };
        let on_disk = map_from_tag(&tag);

        // Only frames whose value changed are rewritten; the rest keep their
        // content, including extra values of multi-valued frames.
        for key in TagKey::ALL {
            let value = track.get(*key);
            let legacy = legacy_frame(*key).filter(|id| tag.get(id).is_some());
            if value == on_disk.get(*key) && legacy.is_none() {
                continue;
            }
            write_slot(&mut tag, key.slot(), value);
            if let Some(id) = legacy {
                tag.remove(id);
            }
        }

        let custom = track.tags().custom();
        for (description, value) in on_disk.custom() {
            if custom.get(description) != Some(value) {
                tag.remove_extended_text(Some(description.as_str()), None);
            }
        }
        for (description, value) in custom {
            if on_disk.custom().get(description) != Some(value) {
                tag.add_frame(ExtendedText {
                    description: description.clone(),
                    value: value.clone(),
                });
            }
        }

        tag.write_to_path(path, Version::Id3v24)
            .map_err(|e| write_err(e.to_string()))?;
        tracing::debug!(path = %path.display(), "tags written");
        Ok(())
    }
}

/// ID3v2.3 frame a v2.4 key falls back to when its own frame is missing.
///
/// v2.4 has no such frames, so a save moves the value to the v2.4 frame.
const fn legacy_frame(key: TagKey) -> Option<&'static str> {
    match key {
        TagKey::Date => Some("TYER"),
        TagKey::OriginalDate => Some("TORY"),
        _ => None,
    }
}

fn text_frame<'a>(tag: &'a Tag, id: &str) -> Option<&'a str> {
    tag.get(id)
        .and_then(|f| f.content().text())
        .and_then(first_value)
}

fn map_from_tag(tag: &Tag) -> TagMap {
    let mut map = TagMap::new();

    for key in TagKey::ALL {
        let value = match key.slot() {
            FrameSlot::Text(id) => text_frame(tag, id)
                .or_else(|| legacy_frame(*key).and_then(|legacy| text_frame(tag, legacy))),
            FrameSlot::Link(id) => tag.get(id).and_then(|f| f.content().link()),
            FrameSlot::UserText(_) => continue,
        };
        if let Some(value) = value {
            map.insert_raw(*key, value);
        }
    }

    for text in tag.extended_texts() {
        match TagKey::from_user_text(&text.description) {
            Some(key) => map.insert_raw(key, text.value.as_str()),
            None => map.set_custom(text.description.as_str(), text.value.as_str()),
        }
    }

    map
}

fn write_slot(tag: &mut Tag, slot: FrameSlot, value: Option<&str>) {
    match slot {
        FrameSlot::Text(id) => match value {
            Some(v) => tag.set_text(id, v),
            None => {
                tag.remove(id);
            }
        },
        FrameSlot::UserText(description) => {
            tag.remove_extended_text(Some(description), None);
            if let Some(v) = value {
                tag.add_frame(ExtendedText {
                    description: description.to_string(),
                    value: v.to_string(),
                });
            }
        }
        FrameSlot::Link(id) => {
            tag.remove(id);
            if let Some(v) = value {
                tag.add_frame(Frame::with_content(id, Content::Link(v.to_string())));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::write_file;
    use tempfile::TempDir;

    fn blank_mp3(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        write_file(&path, b"not really audio");
        path
    }

    #[test]
    fn test_untagged_mp3_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "a.mp3");
        let track = Id3Store.open(&path).unwrap();
        assert!(track.tags().is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        write_file(&path, b"hello");
        let err = Id3Store.open(&path).unwrap_err();
        assert!(matches!(err, TagError::Unsupported { .. }));
        assert!(err.is_read_error());
    }

    #[test]
    fn test_round_trip_known_and_custom() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "song.mp3");

        let mut track = Id3Store.open(&path).unwrap();
        track.set(TagKey::Artist, "ABBA").unwrap();
        track.set(TagKey::ArtistSort, "ABBA").unwrap();
        track.set(TagKey::Album, "Arrival").unwrap();
        track.set(TagKey::TrackNumber, "2/10").unwrap();
        track.set(TagKey::Asin, "B000001").unwrap();
        track.set(TagKey::Website, "https://example.com").unwrap();
        track.tags_mut().set_custom("SOURCE", "vinyl");
        Id3Store.save(&track).unwrap();

        let reread = Id3Store.open(&path).unwrap();
        assert_eq!(reread.get(TagKey::Artist), Some("ABBA"));
        assert_eq!(reread.get(TagKey::ArtistSort), Some("ABBA"));
        assert_eq!(reread.get(TagKey::Album), Some("Arrival"));
        assert_eq!(reread.get(TagKey::TrackNumber), Some("2/10"));
        assert_eq!(reread.get(TagKey::Asin), Some("B000001"));
        assert_eq!(reread.get(TagKey::Website), Some("https://example.com"));
        assert_eq!(
            reread.tags().custom().get("SOURCE").map(String::as_str),
            Some("vinyl")
        );
    }

    #[test]
    fn test_removed_key_is_removed_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "song.mp3");

        let mut track = Id3Store.open(&path).unwrap();
        track.set(TagKey::Genre, "Pop").unwrap();
        track.set(TagKey::Title, "Fernando").unwrap();
        Id3Store.save(&track).unwrap();

        let mut track = Id3Store.open(&path).unwrap();
        track.apply_input(TagKey::Genre, "").unwrap();
        Id3Store.save(&track).unwrap();

        let reread = Id3Store.open(&path).unwrap();
        assert_eq!(reread.get(TagKey::Genre), None);
        assert_eq!(reread.get(TagKey::Title), Some("Fernando"));
    }

    fn write_raw(path: &std::path::Path, version: Version, fill: impl FnOnce(&mut Tag)) {
        let mut tag = Tag::new();
        fill(&mut tag);
        tag.write_to_path(path, version).unwrap();
    }

    #[test]
    fn test_foreign_values_survive_unrelated_edit() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "side_a.mp3");
        write_raw(&path, Version::Id3v24, |tag| {
            tag.set_text("TPE1", "Old");
            tag.set_text("TRCK", "A1");
            tag.set_text("TBPM", "120.5");
        });

        let mut track = Id3Store.open(&path).unwrap();
        assert_eq!(track.get(TagKey::TrackNumber), Some("A1"));
        assert!(track.tags().custom().is_empty());
        track.set(TagKey::Artist, "New").unwrap();
        Id3Store.save(&track).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert_eq!(tag.get("TRCK").and_then(|f| f.content().text()), Some("A1"));
        assert_eq!(tag.get("TBPM").and_then(|f| f.content().text()), Some("120.5"));
        assert_eq!(tag.extended_texts().count(), 0);
        assert_eq!(tag.artist(), Some("New"));
    }

    #[test]
    fn test_multi_valued_genre_kept_when_untouched() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "mix.mp3");
        write_raw(&path, Version::Id3v24, |tag| {
            tag.set_text_values("TCON", ["Rock", "Pop"]);
        });

        let mut track = Id3Store.open(&path).unwrap();
        assert_eq!(track.get(TagKey::Genre), Some("Rock"));
        track.set(TagKey::Title, "Song 2").unwrap();
        Id3Store.save(&track).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        let genres: Vec<&str> = tag
            .get("TCON")
            .and_then(|f| f.content().text_values())
            .unwrap()
            .collect();
        assert_eq!(genres, vec!["Rock", "Pop"]);
    }

    #[test]
    fn test_v23_year_reads_as_date_and_moves_on_save() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "old.mp3");
        write_raw(&path, Version::Id3v23, |tag| {
            tag.set_text("TYER", "1979");
            tag.set_text("TORY", "1978");
        });

        let mut track = Id3Store.open(&path).unwrap();
        assert_eq!(track.get(TagKey::Date), Some("1979"));
        assert_eq!(track.get(TagKey::OriginalDate), Some("1978"));
        track.set(TagKey::Album, "Reissue").unwrap();
        Id3Store.save(&track).unwrap();

        let tag = Tag::read_from_path(&path).unwrap();
        assert!(tag.get("TYER").is_none());
        assert!(tag.get("TORY").is_none());
        assert_eq!(tag.get("TDRC").and_then(|f| f.content().text()), Some("1979"));
        assert_eq!(tag.get("TDOR").and_then(|f| f.content().text()), Some("1978"));
    }

    #[test]
    fn test_removed_custom_field_is_dropped() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "c.mp3");
        let mut track = Id3Store.open(&path).unwrap();
        track.tags_mut().set_custom("SOURCE", "vinyl");
        track.tags_mut().set_custom("RIP", "eac");
        Id3Store.save(&track).unwrap();

        let mut track = Id3Store.open(&path).unwrap();
        track.tags_mut().set_custom("SOURCE", "");
        track.tags_mut().set_custom("RIP", "xld");
        Id3Store.save(&track).unwrap();

        let custom = Id3Store.open(&path).unwrap().tags().custom().clone();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom.get("RIP").map(String::as_str), Some("xld"));
    }

    #[test]
    fn test_rename() {
        let dir = TempDir::new().unwrap();
        let path = blank_mp3(&dir, "old.mp3");
        let mut track = Id3Store.open(&path).unwrap();

        Id3Store.rename(&mut track, "new.mp3").unwrap();
        assert_eq!(track.file_name(), Some("new.mp3"));
        assert!(dir.path().join("new.mp3").exists());
        assert!(!path.exists());

        assert!(Id3Store.rename(&mut track, "sub/dir.mp3").is_err());
    }
}
