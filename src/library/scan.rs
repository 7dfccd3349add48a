//! Library scanning
//!
//! Walks a library root and collects regular files whose names end with one of
//! a set of extension strings. Symbolic links are never followed or returned and
//! unreadable entries are logged and skipped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::{LibraryError, validate_root};

type Result<T> = std::result::Result<T, LibraryError>;

/// Named extension presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionSet {
    /// `.mp3` files
    Mp3,
    /// `.mp4` and `.m4a` files
    Mp4,
    /// The configured audio extensions
    Audio,
    /// Every regular file
    All,
}

impl ExtensionSet {
    /// Resolve the preset to suffix strings. `Audio` uses `configured`.
    #[must_use]
    pub fn suffixes(self, configured: &[String]) -> Vec<String> {
        match self {
            Self::Mp3 => vec![".mp3".to_string()],
            Self::Mp4 => vec![".mp4".to_string(), ".m4a".to_string()],
            Self::Audio => configured.to_vec(),
            Self::All => Vec::new(),
        }
    }
}

/// Options controlling a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Case-sensitive filename suffixes; empty matches every file
    pub extensions: Vec<String>,
    /// Descend into subdirectories
    pub recurse: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::all()
    }
}

impl ScanOptions {
    /// Every regular file at any depth
    #[must_use]
    pub const fn all() -> Self {
        Self {
            extensions: Vec::new(),
            recurse: true,
        }
    }

    /// Files matching `extensions` at any depth
    #[must_use]
    pub fn with_extensions<S: Into<String>>(extensions: impl IntoIterator<Item = S>) -> Self {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
            recurse: true,
        }
    }

    /// Restrict the scan to direct children of the root
    #[must_use]
    pub fn shallow(mut self) -> Self {
        self.recurse = false;
        self
    }

    /// Whether `name` passes the extension filter
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.extensions.is_empty() || self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Collect matching files under `root`.
///
/// Order follows the directory listing and is not sorted.
///
/// # Errors
/// Returns `LibraryError::InvalidRoot` if `root` does not exist or is not a
/// directory. Errors on individual entries are logged and skipped.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    validate_root(root)?;

    let mut walker = WalkDir::new(root).min_depth(1).follow_links(false);
    if !options.recurse {
        walker = walker.max_depth(1);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let location = e
                    .path()
                    .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                tracing::warn!(path = %location, error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            tracing::debug!(path = %entry.path().display(), "skipping symlink");
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        if options.matches(name) {
            found.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = found.len(), "scan finished");
    Ok(found)
}
