//! Output formatting for CLI display
//!
//! This module provides utilities for formatting output in the CLI,
//! including path display formatting and tag listings.

use crate::config::PathFormat;
use crate::tags::{TagKey, Track};
use colored::Colorize;
use std::path::Path;

/// Format a path according to the display mode
#[must_use]
pub fn format_path(path: &Path, format: PathFormat) -> String {
    match format {
        PathFormat::Absolute => path.display().to_string(),
        PathFormat::Relative => {
            if let Ok(cwd) = std::env::current_dir()
                && let Ok(rel_path) = path.strip_prefix(&cwd)
            {
                return rel_path.display().to_string();
            }
            // Fallback to absolute if relative path cannot be computed
            path.display().to_string()
        }
    }
}

/// Format one tag line, showing `-` for an absent value
#[must_use]
pub fn tag_line(key: TagKey, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("  {:<22} {v}", format!("{key}:").bold()),
        None => format!("  {:<22} {}", format!("{key}:").bold(), "-".dimmed()),
    }
}

/// Lines describing a track: main keys always, other keys when set or `all`
#[must_use]
pub fn track_lines(track: &Track, all: bool) -> Vec<String> {
    let mut lines: Vec<String> = TagKey::MAIN
        .iter()
        .map(|key| tag_line(*key, track.get(*key)))
        .collect();

    let extended: Vec<String> = TagKey::extended()
        .filter(|key| all || track.get(*key).is_some())
        .map(|key| tag_line(key, track.get(key)))
        .collect();
    if !extended.is_empty() {
        lines.push(format!("  {}", "Extended:".underline()));
        lines.extend(extended);
    }

    let vendor: Vec<String> = TagKey::ALL
        .iter()
        .filter(|key| key.is_vendor() && track.get(**key).is_some())
        .map(|key| tag_line(*key, track.get(*key)))
        .collect();
    if all && !vendor.is_empty() {
        lines.push(format!("  {}", "Vendor:".underline()));
        lines.extend(vendor);
    }

    let custom = track.tags().custom();
    if !custom.is_empty() {
        lines.push(format!("  {}", "Custom:".underline()));
        for (description, value) in custom {
            lines.push(format!("  {:<22} {value}", format!("{description}:").bold()));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagMap;
    use std::path::PathBuf;

    #[test]
    fn test_absolute_format_unchanged() {
        let path = PathBuf::from("/music/a.mp3");
        assert_eq!(format_path(&path, PathFormat::Absolute), "/music/a.mp3");
    }

    #[test]
    fn test_relative_format_strips_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let path = cwd.join("library").join("a.mp3");
        let shown = format_path(&path, PathFormat::Relative);
        assert_eq!(PathBuf::from(shown), PathBuf::from("library").join("a.mp3"));
    }

    #[test]
    fn test_track_lines_hide_unset_extended() {
        colored::control::set_override(false);
        let mut tags = TagMap::new();
        tags.set(TagKey::Artist, "Blur").unwrap();
        tags.set(TagKey::AlbumSort, "Parklife").unwrap();
        let track = Track::new(PathBuf::from("/m/a.mp3"), tags);

        let lines = track_lines(&track, false);
        assert_eq!(lines.len(), TagKey::MAIN.len() + 2);
        assert!(lines.iter().any(|l| l.contains("artist:") && l.ends_with("Blur")));
        assert!(lines.iter().any(|l| l.contains("albumsort:")));
        assert!(!lines.iter().any(|l| l.contains("composer:")));

        let all = track_lines(&track, true);
        assert!(all.iter().any(|l| l.contains("composer:")));
    }
}
