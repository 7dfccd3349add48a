//! Tuneshelf - tag-driven organization for audio libraries on disk
//!
//! This library discovers audio files, reads and writes their embedded tags,
//! moves them into an `artist/album` hierarchy, rewrites tags across a whole
//! library and prunes directories those operations leave empty.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod library;
pub mod output;
pub mod session;
pub mod tags;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TuneshelfError {
    /// Library (filesystem) error
    #[error("Library error: {0}")]
    LibraryError(#[from] library::LibraryError),
    /// Tag read/write error
    #[error("Tag error: {0}")]
    TagError(#[from] tags::TagError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Report serialization error
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
