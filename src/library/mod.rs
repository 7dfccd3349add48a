//! Filesystem side of the library
//!
//! - `sanitize`: turn tag text into a safe directory segment
//! - `scan`: enumerate files under a root by extension
//! - `fsops`: moves and emptiness checks shared by the batch operations

mod error;
pub mod fsops;
pub mod sanitize;
pub mod scan;

pub use error::LibraryError;
pub use sanitize::{SafeName, sanitize};
pub use scan::{ExtensionSet, ScanOptions, scan};

use std::path::Path;

/// Check that `root` exists and is a directory.
///
/// # Errors
/// Returns `LibraryError::InvalidRoot` describing which check failed.
pub fn validate_root(root: &Path) -> Result<(), LibraryError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(LibraryError::invalid_root(root, "not a directory")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(LibraryError::invalid_root(root, "does not exist"))
        }
        Err(e) => Err(LibraryError::invalid_root(root, &e.to_string())),
    }
}
