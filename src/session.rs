//! Interactive editing session over the files of a library
//!
//! A [`Session`] holds the scanned file list and a cursor. The browse command
//! drives it; the type itself does no terminal I/O.

use std::path::{Path, PathBuf};

use crate::library::{self, LibraryError, ScanOptions};
use crate::tags::{MetadataStore, TagError, TagKey, Track};

/// One step offered while browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Next,
    Back,
    EditMain,
    EditExtended,
    Rename,
    Quit,
}

impl BrowseAction {
    /// Menu order
    pub const ALL: &'static [Self] = &[
        Self::Next,
        Self::Back,
        Self::EditMain,
        Self::EditExtended,
        Self::Rename,
        Self::Quit,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Back => "Back",
            Self::EditMain => "Edit tags",
            Self::EditExtended => "Edit extended tags",
            Self::Rename => "Rename",
            Self::Quit => "Quit",
        }
    }

    /// Keys an edit action prompts for, in schema order. Vendor keys are
    /// never offered; they stay reachable through `edit --set`.
    #[must_use]
    pub fn keys(self) -> Vec<TagKey> {
        match self {
            Self::EditMain => TagKey::MAIN.to_vec(),
            Self::EditExtended => TagKey::extended().collect(),
            _ => Vec::new(),
        }
    }
}

/// Cursor over a fixed list of library files
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
}

impl Session {
    /// Scan `root` and start at the first file.
    ///
    /// # Errors
    /// Returns `LibraryError::InvalidRoot` if `root` is not an existing directory.
    pub fn load(root: &Path, options: &ScanOptions) -> Result<Self, LibraryError> {
        let files = library::scan(root, options)?;
        tracing::debug!(root = %root.display(), files = files.len(), "session loaded");
        Ok(Self::from_files(root.to_path_buf(), files))
    }

    #[must_use]
    pub const fn from_files(root: PathBuf, files: Vec<PathBuf>) -> Self {
        Self {
            root,
            files,
            cursor: 0,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Zero-based cursor position
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current(&self) -> Option<&Path> {
        self.files.get(self.cursor).map(PathBuf::as_path)
    }

    /// Move to the next file, wrapping to the first after the last
    pub fn advance(&mut self) {
        if !self.files.is_empty() {
            self.cursor = (self.cursor + 1) % self.files.len();
        }
    }

    /// Move to the previous file, wrapping to the last before the first
    pub fn retreat(&mut self) {
        if !self.files.is_empty() {
            self.cursor = self
                .cursor
                .checked_sub(1)
                .unwrap_or(self.files.len() - 1);
        }
    }

    /// Open the current file, moving forward past files that cannot be read.
    ///
    /// Gives up after one full lap and returns `None`.
    pub fn open_current<S: MetadataStore + ?Sized>(&mut self, store: &S) -> Option<Track> {
        for _ in 0..self.files.len() {
            let path = &self.files[self.cursor];
            match store.open(path) {
                Ok(track) => return Some(track),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                    self.advance();
                }
            }
        }
        None
    }

    /// Apply `edits` to `track`, save it and optionally rename its file.
    ///
    /// Blank edit values clear the tag. A rename to the current name is a
    /// no-op. After a rename the session's entry follows the file.
    ///
    /// # Errors
    /// Returns `TagError::InvalidValue` before anything is written if an edit
    /// is rejected, `TagError::Write` if saving fails and `TagError::Rename`
    /// if the rename fails.
    pub fn save_current<S: MetadataStore + ?Sized>(
        &mut self,
        store: &S,
        track: &mut Track,
        edits: &[(TagKey, String)],
        new_name: Option<&str>,
    ) -> Result<(), TagError> {
        for (key, input) in edits {
            track.apply_input(*key, input)?;
        }
        store.save(track)?;

        if let Some(name) = new_name.map(str::trim)
            && track.file_name() != Some(name)
        {
            store.rename(track, name)?;
            if let Some(entry) = self.files.get_mut(self.cursor) {
                *entry = track.path().to_path_buf();
            }
        }
        Ok(())
    }
}
