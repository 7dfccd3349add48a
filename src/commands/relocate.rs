//! Move command - transplant a flat list of files into a destination directory

use std::path::{Path, PathBuf};

use super::core::{BulkOpSummary, Outcome};
use crate::library::{self, LibraryError, fsops};
use crate::TuneshelfError;

/// Input format of a file list
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ListFormat {
    /// One path per line, `#` starts a comment
    Text,
    /// First column of each record
    Csv,
    /// Array of paths or of `{ "file": ... }` objects
    Json,
}

/// Move each of `files` to `destination/<file name>`.
///
/// No hierarchy is created. An existing file at the target is replaced; a
/// file already at its target is left alone.
///
/// # Errors
/// Returns `LibraryError::InvalidRoot` if either root is not an existing
/// directory, before any file is touched.
pub fn move_all(
    destination: &Path,
    source: &Path,
    files: &[PathBuf],
    dry_run: bool,
) -> Result<BulkOpSummary, LibraryError> {
    library::validate_root(destination)?;
    library::validate_root(source)?;

    let mut summary = BulkOpSummary::dry_run(dry_run);
    for file in files {
        let Some(name) = file.file_name() else {
            summary.record_error(file, &"path has no file name");
            continue;
        };
        let target = destination.join(name);

        if fsops::same_file(file, &target) {
            summary.record(file, Outcome::Unchanged);
            continue;
        }
        if dry_run {
            summary.record(file, Outcome::Moved { to: target });
            continue;
        }
        match fsops::move_replace(file, &target) {
            Ok(()) => {
                tracing::info!(from = %file.display(), to = %target.display(), "moved");
                summary.record(file, Outcome::Moved { to: target });
            }
            Err(e) => summary.record_error(file, &e),
        }
    }
    Ok(summary)
}

/// Read a file list, resolving relative entries against `base`.
///
/// # Errors
/// Returns `TuneshelfError::InvalidInput` if the list cannot be read or parsed.
pub fn read_file_list(
    list: &Path,
    format: ListFormat,
    base: &Path,
) -> Result<Vec<PathBuf>, TuneshelfError> {
    let content = std::fs::read_to_string(list).map_err(|e| {
        TuneshelfError::InvalidInput(format!("Failed to read {}: {}", list.display(), e))
    })?;
    let entries = match format {
        ListFormat::Text => parse_plaintext(&content),
        ListFormat::Csv => parse_csv(&content)?,
        ListFormat::Json => parse_json(&content)?,
    };
    Ok(entries
        .into_iter()
        .map(|p| if p.is_absolute() { p } else { base.join(p) })
        .collect())
}

pub fn parse_plaintext(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(PathBuf::from)
        .collect()
}

pub fn parse_csv(content: &str) -> Result<Vec<PathBuf>, TuneshelfError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut entries = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            TuneshelfError::InvalidInput(format!("Invalid CSV at record {}: {}", i + 1, e))
        })?;
        match record.get(0).map(str::trim) {
            Some(file) if !file.is_empty() => entries.push(PathBuf::from(file)),
            _ => {
                return Err(TuneshelfError::InvalidInput(format!(
                    "Invalid CSV at record {}: missing file path",
                    i + 1
                )));
            }
        }
    }
    Ok(entries)
}

pub fn parse_json(content: &str) -> Result<Vec<PathBuf>, TuneshelfError> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum JsonEntry {
        Path(String),
        Object { file: String },
    }
    let parsed: Vec<JsonEntry> = serde_json::from_str(content)
        .map_err(|e| TuneshelfError::InvalidInput(format!("Invalid JSON: {e}")))?;
    Ok(parsed
        .into_iter()
        .map(|entry| match entry {
            JsonEntry::Path(file) | JsonEntry::Object { file } => PathBuf::from(file),
        })
        .collect())
}
