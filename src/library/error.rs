//! Library-level error types
//!
//! Errors raised while validating library roots and touching the filesystem.
//!
//! # Error Types
//!
//! - **`InvalidRoot`**: a supplied root is missing or not a directory. Always
//!   fatal for the operation and raised before anything is mutated.
//! - **`Move`**: a single file could not be relocated. Batch operations record
//!   it against the file and keep going.
//! - **`Io`**: any other filesystem failure, with the path involved.

use std::path::PathBuf;
use thiserror::Error;

/// Filesystem and validation errors
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A library root failed validation
    #[error("Invalid library root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// Moving a file failed
    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O failure on a path
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation was invoked without anything to do
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LibraryError {
    #[must_use]
    pub fn invalid_root(path: impl Into<PathBuf>, reason: &str) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
