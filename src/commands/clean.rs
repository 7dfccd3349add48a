//! Clean command - remove empty directories under a library root

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::config::PathFormat;
use crate::library::{self, LibraryError, fsops};
use crate::output;

type Result<T> = std::result::Result<T, LibraryError>;

/// Traversal strategy
///
/// Both modes remove the same directories: a post-order pass already leaves
/// no empty directory behind. `FixedPoint` adds a confirming pass, which only
/// finds work when something else empties a directory during the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CleanMode {
    /// One depth-first pass; parents are checked after their children
    #[default]
    SinglePass,
    /// Repeat passes until one removes nothing; same result as `SinglePass`
    /// plus one confirming pass
    FixedPoint,
}

/// Directories removed and failures met during a clean
#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
    pub passes: usize,
}

impl CleanReport {
    pub fn print(&self, path_format: PathFormat) {
        println!("\n{}", "=== Clean Summary ===".bold());
        println!("  {} {}", "✓ Removed:".green(), self.removed.len());
        if self.passes > 1 {
            println!("  {} {}", "↻ Passes:".cyan(), self.passes);
        }
        if !self.failures.is_empty() {
            println!("  {} {}", "✗ Errors:".red(), self.failures.len());
            println!("\n{}", "Error details:".red().bold());
            for (path, error) in &self.failures {
                println!("  - {}: {error}", output::format_path(path, path_format));
            }
        }
    }
}

/// Remove every empty directory below `root`.
///
/// Each subdirectory is visited before its parent is checked, so a parent
/// whose only content was an empty child is removed in the same pass. `root`
/// itself is never removed and symlinks are never followed.
///
/// # Errors
/// Returns `LibraryError::InvalidRoot` if `root` is not an existing directory.
pub fn clean(root: &Path, mode: CleanMode) -> Result<CleanReport> {
    library::validate_root(root)?;

    let mut report = CleanReport::default();
    loop {
        report.passes += 1;
        let before = report.removed.len();
        sweep(root, &mut report);
        let removed = report.removed.len() - before;
        tracing::debug!(pass = report.passes, removed, "clean pass finished");

        if mode == CleanMode::SinglePass || removed == 0 {
            break;
        }
    }
    Ok(report)
}

fn sweep(dir: &Path, report: &mut CleanReport) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "cannot read directory");
            report.failures.push((dir.to_path_buf(), e.to_string()));
            return;
        }
    };

    // Collect first so removals don't race the open listing.
    let subdirs: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .map(|entry| entry.path())
        .collect();

    for subdir in subdirs {
        sweep(&subdir, report);
        match fsops::is_empty_dir(&subdir) {
            Ok(true) => match fs::remove_dir(&subdir) {
                Ok(()) => {
                    tracing::info!(path = %subdir.display(), "removed empty directory");
                    report.removed.push(subdir);
                }
                Err(e) => {
                    tracing::warn!(path = %subdir.display(), error = %e, "cannot remove directory");
                    report.failures.push((subdir, e.to_string()));
                }
            },
            Ok(false) => {}
            Err(e) => report.failures.push((subdir, e.to_string())),
        }
    }
}
