use std::path::{Path, is_separator};

use super::{TagError, Track};

/// Read/write access to a file's tags.
///
/// Implementations own the concrete tag format. Every call opens and releases
/// the file itself, so no handle outlives a single method call.
pub trait MetadataStore {
    /// Load the tags of the file at `path`.
    ///
    /// A file without any tag yet yields an empty map; a file that is not a
    /// container for this format yields a read error.
    ///
    /// # Errors
    /// Returns `TagError::Read` or `TagError::Unsupported`.
    fn open(&self, path: &Path) -> Result<Track, TagError>;

    /// Write the track's tags back to its file.
    ///
    /// # Errors
    /// Returns `TagError::Write` if the tag cannot be written.
    fn save(&self, track: &Track) -> Result<(), TagError>;

    /// Rename the track's file within its directory.
    ///
    /// # Errors
    /// Returns `TagError::Rename` if `new_name` is not a bare file name or the
    /// rename fails.
    fn rename(&self, track: &mut Track, new_name: &str) -> Result<(), TagError> {
        let rename_err = |reason: String| TagError::Rename {
            path: track.path().to_path_buf(),
            new_name: new_name.to_string(),
            reason,
        };

        if new_name.trim().is_empty()
            || new_name.chars().any(is_separator)
            || matches!(new_name, "." | "..")
        {
            return Err(rename_err("not a plain file name".to_string()));
        }

        let target = track.path().with_file_name(new_name);
        if target.exists() {
            return Err(rename_err("a file with that name already exists".to_string()));
        }
        std::fs::rename(track.path(), &target).map_err(|e| rename_err(e.to_string()))?;

        tracing::info!(from = %track.path().display(), to = %target.display(), "renamed");
        track.set_path(target);
        Ok(())
    }
}
