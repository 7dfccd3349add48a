//! Mass update command - set tag keys to one value across a library

use std::path::{Path, PathBuf};

use super::core::{BulkOpSummary, Outcome};
use crate::library::{self, LibraryError, ScanOptions};
use crate::tags::{MetadataStore, TagKey};

/// Article ignored by sort keys
pub const SORT_ARTICLE: &str = "The ";

/// Options for [`mass_update`]
#[derive(Debug, Clone)]
pub struct MassUpdateOptions {
    /// Filename suffixes of files to update
    pub extensions: Vec<String>,
    pub dry_run: bool,
}

/// Result of a mass update
#[derive(Debug)]
pub enum MassUpdateOutcome {
    /// Value was blank; nothing was scanned or written
    NoOp,
    /// The update ran over the library
    Applied(BulkOpSummary),
}

/// Value stored under `key` when the requested value is `value`
#[must_use]
pub fn value_for_key(key: TagKey, value: &str) -> &str {
    if key.is_sort_variant() {
        value.strip_prefix(SORT_ARTICLE).unwrap_or(value)
    } else {
        value
    }
}

/// Collect the files a mass update would touch
///
/// # Errors
/// Returns `LibraryError::InvalidRoot` if `root` is not an existing directory.
pub fn candidates(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, LibraryError> {
    library::scan(root, &ScanOptions::with_extensions(extensions.iter().cloned()))
}

/// Set every key in `keys` to `new_value` on every matching file under `root`.
///
/// The value is trimmed first; a blank value makes the call a no-op. Sort
/// keys drop a leading "The ". Each file is saved once after all its keys
/// are set; a file that fails to open, validate or save is recorded and
/// skipped.
///
/// # Errors
/// Returns `LibraryError::InvalidInput` if `keys` is empty and
/// `LibraryError::InvalidRoot` if `root` is not an existing directory.
pub fn mass_update<S: MetadataStore + ?Sized>(
    store: &S,
    root: &Path,
    keys: &[TagKey],
    new_value: &str,
    options: &MassUpdateOptions,
) -> Result<MassUpdateOutcome, LibraryError> {
    let value = new_value.trim();
    if value.is_empty() {
        tracing::info!("blank value, nothing to update");
        return Ok(MassUpdateOutcome::NoOp);
    }
    if keys.is_empty() {
        return Err(LibraryError::InvalidInput("no tag keys to update".to_string()));
    }

    let files = candidates(root, &options.extensions)?;
    tracing::info!(root = %root.display(), files = files.len(), value, "mass update");

    let mut summary = BulkOpSummary::dry_run(options.dry_run);
    for file in files {
        let mut track = match store.open(&file) {
            Ok(track) => track,
            Err(e) => {
                summary.record_error(&file, &e);
                continue;
            }
        };

        let mut changed = false;
        let mut failed = None;
        for key in keys {
            let stored = value_for_key(*key, value);
            if track.get(*key) == Some(stored) {
                continue;
            }
            if let Err(e) = track.set(*key, stored) {
                failed = Some(e);
                break;
            }
            changed = true;
        }

        if let Some(e) = failed {
            summary.record_error(&file, &e);
        } else if !changed {
            summary.record(&file, Outcome::Unchanged);
        } else if options.dry_run {
            summary.record(&file, Outcome::Updated);
        } else {
            match store.save(&track) {
                Ok(()) => {
                    tracing::info!(path = %file.display(), "tags updated");
                    summary.record(&file, Outcome::Updated);
                }
                Err(e) => summary.record_error(&file, &e),
            }
        }
    }

    Ok(MassUpdateOutcome::Applied(summary))
}
