//! Tag-specific error types
//!
//! Read failures (`Read`, `Unsupported`) and write failures (`Write`,
//! `InvalidValue`) are recoverable: batch operations record them against the
//! file and move on to the next one.

use std::path::PathBuf;
use thiserror::Error;

use super::TagKey;

/// Errors reading or writing a file's tags
#[derive(Debug, Error)]
pub enum TagError {
    /// File is not a parseable tag container
    #[error("Cannot read tags from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// File type has no supported tag format
    #[error("Unsupported file type: {path}")]
    Unsupported { path: PathBuf },

    /// Writing the tag back failed
    #[error("Cannot write tags to {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// Value rejected by a constrained field
    #[error("Invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: TagKey,
        value: String,
        expected: &'static str,
    },

    /// Key name is not part of the schema
    #[error("Unknown tag key: {0}")]
    UnknownKey(String),

    /// Renaming the file failed
    #[error("Cannot rename {path} to {new_name}: {reason}")]
    Rename {
        path: PathBuf,
        new_name: String,
        reason: String,
    },
}

impl TagError {
    /// Whether the error happened while reading (the file was skipped untouched)
    #[must_use]
    pub const fn is_read_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Unsupported { .. })
    }
}
