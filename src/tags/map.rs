//! In-memory tag map and the track it belongs to

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{TagError, TagKey};

/// Tag values for one file.
///
/// Known keys live in `known`; user-defined fields that are not part of the
/// schema are kept verbatim in `custom` so they survive a save. Stored values
/// are never empty: setting an empty value removes the key instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagMap {
    known: BTreeMap<TagKey, String>,
    custom: BTreeMap<String, String>,
}

impl TagMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value, `None` when no value is set
    #[must_use]
    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.known.get(&key).map(String::as_str)
    }

    /// Store a value after checking the key's constraint.
    ///
    /// # Errors
    /// Returns `TagError::InvalidValue` if the key rejects the value.
    pub fn set(&mut self, key: TagKey, value: impl Into<String>) -> Result<(), TagError> {
        let value = value.into();
        if value.is_empty() {
            self.remove(key);
            return Ok(());
        }
        key.validate(&value)?;
        self.known.insert(key, value);
        Ok(())
    }

    /// Store a value exactly as a file holds it, without the key's constraint.
    ///
    /// Stores use this when loading so that a value written by another tool
    /// (track "A1", bpm "120.5") stays under its own key.
    pub(crate) fn insert_raw(&mut self, key: TagKey, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.known.remove(&key);
        } else {
            self.known.insert(key, value);
        }
    }

    /// Remove a key, returning the old value
    pub fn remove(&mut self, key: TagKey) -> Option<String> {
        self.known.remove(&key)
    }

    /// Known keys with values, in schema order
    pub fn iter(&self) -> impl Iterator<Item = (TagKey, &str)> {
        self.known.iter().map(|(k, v)| (*k, v.as_str()))
    }

    #[must_use]
    pub fn custom(&self) -> &BTreeMap<String, String> {
        &self.custom
    }

    pub fn set_custom(&mut self, description: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let description = description.into();
        if value.is_empty() {
            self.custom.remove(&description);
        } else {
            self.custom.insert(description, value);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.custom.is_empty()
    }
}

/// One audio file and its tags as loaded by a [`super::MetadataStore`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    path: PathBuf,
    tags: TagMap,
}

impl Track {
    #[must_use]
    pub const fn new(path: PathBuf, tags: TagMap) -> Self {
        Self { path, tags }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base filename of the track's current location
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    #[must_use]
    pub const fn tags(&self) -> &TagMap {
        &self.tags
    }

    pub const fn tags_mut(&mut self) -> &mut TagMap {
        &mut self.tags
    }

    #[must_use]
    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.tags.get(key)
    }

    /// # Errors
    /// Returns `TagError::InvalidValue` if the key rejects the value.
    pub fn set(&mut self, key: TagKey, value: impl Into<String>) -> Result<(), TagError> {
        self.tags.set(key, value)
    }

    pub fn remove(&mut self, key: TagKey) -> Option<String> {
        self.tags.remove(key)
    }

    /// Apply a value typed by the user: blank input clears the tag.
    ///
    /// # Errors
    /// Returns `TagError::InvalidValue` if the key rejects the value.
    pub fn apply_input(&mut self, key: TagKey, input: &str) -> Result<(), TagError> {
        let input = input.trim();
        if input.is_empty() {
            self.tags.remove(key);
            Ok(())
        } else {
            self.tags.set(key, input)
        }
    }

    pub(crate) fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }
}
