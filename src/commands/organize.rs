//! Organize command - move files into an artist/album tree built from their tags

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::core::{BulkOpSummary, Outcome, SkipReason};
use crate::library::{self, LibraryError, SafeName, ScanOptions, fsops};
use crate::tags::{MetadataStore, TagKey, TagMap};

type Result<T> = std::result::Result<T, LibraryError>;

/// What to do when a file already exists at the target path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Leave both files where they are
    Skip,
}

/// Options for [`organize`]
#[derive(Debug, Clone, Copy, Default)]
pub struct OrganizeOptions {
    pub collision: CollisionPolicy,
    pub dry_run: bool,
}

/// Directory a file with these tags belongs in, relative to `destination`.
///
/// The artist folder is used when the artist tag is set; the album folder is
/// added below it only when both are set.
#[must_use]
pub fn target_dir(destination: &Path, tags: &TagMap) -> PathBuf {
    let mut dir = destination.to_path_buf();

    let Some(artist) = folder_for(tags, TagKey::Artist) else {
        return dir;
    };
    dir.push(artist.as_str());

    if let Some(album) = folder_for(tags, TagKey::Album) {
        dir.push(album.as_str());
    }
    dir
}

fn folder_for(tags: &TagMap, key: TagKey) -> Option<SafeName> {
    let name = SafeName::from_tag(tags.get(key))?;
    if name.is_usable() {
        Some(name)
    } else {
        if !name.is_blank() {
            tracing::warn!(key = %key, value = %name, "tag value cannot be used as a folder name");
        }
        None
    }
}

/// Move every file under `source` into `destination/<artist>/<album>/`.
///
/// Files whose tags cannot be read, or which fail to move, are recorded in the
/// summary and the rest of the library is still processed. A file already at
/// its target path is left alone.
///
/// # Errors
/// Returns `LibraryError::InvalidRoot` if either root is not an existing
/// directory. Nothing is touched in that case.
pub fn organize<S: MetadataStore + ?Sized>(
    store: &S,
    source: &Path,
    destination: &Path,
    options: OrganizeOptions,
) -> Result<BulkOpSummary> {
    library::validate_root(source)?;
    library::validate_root(destination)?;

    let files = library::scan(source, &ScanOptions::all())?;
    tracing::info!(source = %source.display(), files = files.len(), "organizing");

    let mut summary = BulkOpSummary::dry_run(options.dry_run);
    for file in files {
        match organize_file(store, &file, destination, options) {
            Ok(outcome) => summary.record(&file, outcome),
            Err(e) => summary.record_error(&file, &e),
        }
    }
    Ok(summary)
}

fn organize_file<S: MetadataStore + ?Sized>(
    store: &S,
    file: &Path,
    destination: &Path,
    options: OrganizeOptions,
) -> std::result::Result<Outcome, crate::TuneshelfError> {
    let Some(file_name) = file.file_name() else {
        return Err(LibraryError::InvalidInput(format!("{} has no file name", file.display())).into());
    };

    // The track is dropped before the move; nothing holds the file open.
    let dir = {
        let track = store.open(file)?;
        target_dir(destination, track.tags())
    };
    let target = dir.join(file_name);

    if fsops::same_file(file, &target) {
        tracing::debug!(path = %file.display(), "already in place");
        return Ok(Outcome::Unchanged);
    }
    if target.exists() && options.collision == CollisionPolicy::Skip {
        return Ok(Outcome::Skipped {
            reason: SkipReason::TargetExists,
        });
    }
    if options.dry_run {
        return Ok(Outcome::Moved { to: target });
    }

    fs::create_dir_all(&dir).map_err(|e| LibraryError::io(&dir, e))?;
    fsops::move_replace(file, &target)?;
    tracing::info!(from = %file.display(), to = %target.display(), "moved");
    Ok(Outcome::Moved { to: target })
}
