use colored::Colorize;
use dialoguer::Confirm;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::{TuneshelfError, config::PathFormat, output};

type Result<T> = std::result::Result<T, TuneshelfError>;

/// What happened to one file during a batch operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// File was moved (or would be, in a dry run)
    Moved { to: PathBuf },
    /// Tags were written (or would be, in a dry run)
    Updated,
    /// File already matched the requested state
    Unchanged,
    /// File was deliberately left alone
    Skipped { reason: SkipReason },
    /// Processing the file failed; the batch continued
    Failed { error: String },
}

/// Reason a file was skipped during a batch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Target path is occupied and overwriting is disabled
    TargetExists,
}

impl SkipReason {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::TargetExists => "target exists",
        }
    }
}

/// Per-file outcome record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Summary of batch operation results
#[derive(Debug, Default, Serialize)]
pub struct BulkOpSummary {
    pub success: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub errors: usize,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
}

impl BulkOpSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dry_run(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Record a file's outcome and update the counters
    pub fn record(&mut self, path: &Path, outcome: Outcome) {
        match &outcome {
            Outcome::Moved { .. } | Outcome::Updated => self.success += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.errors += 1,
        }
        self.outcomes.push(FileOutcome {
            path: path.to_path_buf(),
            outcome,
        });
    }

    /// Record a failure, logging it as a warning
    pub fn record_error(&mut self, path: &Path, error: &dyn std::fmt::Display) {
        tracing::warn!(path = %path.display(), error = %error, "skipping file");
        self.record(
            path,
            Outcome::Failed {
                error: error.to_string(),
            },
        );
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.unchanged + self.skipped + self.errors
    }

    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.outcome {
            Outcome::Failed { error } => Some((o.path.as_path(), error.as_str())),
            _ => None,
        })
    }

    pub fn print(&self, operation: &str, path_format: PathFormat) {
        let heading = if self.dry_run {
            format!("=== {operation} Summary (dry run) ===")
        } else {
            format!("=== {operation} Summary ===")
        };
        println!("\n{}", heading.bold());
        println!("  {} {}", "✓ Success:".green(), self.success);
        if self.unchanged > 0 {
            println!("  {} {}", "= Unchanged:".cyan(), self.unchanged);
        }
        if self.skipped > 0 {
            println!("  {} {}", "⊘ Skipped:".yellow(), self.skipped);
        }
        if self.errors > 0 {
            println!("  {} {}", "✗ Errors:".red(), self.errors);
            println!("\n{}", "Error details:".red().bold());
            for (path, error) in self.failures() {
                println!("  - {}: {error}", output::format_path(path, path_format));
            }
        }
    }

    /// Print one line per file, used for verbose and dry-run output
    pub fn print_outcomes(&self, path_format: PathFormat) {
        for record in &self.outcomes {
            let path = output::format_path(&record.path, path_format);
            match &record.outcome {
                Outcome::Moved { to } => println!(
                    "{} {path} -> {}",
                    "→".green(),
                    output::format_path(to, path_format)
                ),
                Outcome::Updated => println!("{} {path}", "✓".green()),
                Outcome::Unchanged => println!("{} {path}", "=".cyan()),
                Outcome::Skipped { reason } => {
                    println!("{} {path} ({})", "⊘".yellow(), reason.describe());
                }
                Outcome::Failed { error } => println!("{} {path}: {error}", "✗".red()),
            }
        }
    }
}

/// Show a yes/no confirmation prompt
///
/// # Errors
/// Returns `TuneshelfError::InvalidInput` if the prompt cannot be shown.
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| TuneshelfError::InvalidInput(format!("Failed to get confirmation: {e}")))
}
