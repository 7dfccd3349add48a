//! Command implementations
//!
//! Each command runs a whole-library operation and returns a summary that the
//! binary prints. Per-file failures are recorded in the summary; only invalid
//! roots or arguments abort a command.

pub mod clean;
pub mod core;
pub mod mass_update;
pub mod organize;
pub mod relocate;

pub use clean::{CleanMode, CleanReport, clean};
pub use self::core::{BulkOpSummary, FileOutcome, Outcome, SkipReason, confirm};
pub use mass_update::{MassUpdateOptions, MassUpdateOutcome, mass_update};
pub use organize::{CollisionPolicy, OrganizeOptions, organize};
pub use relocate::{ListFormat, move_all, read_file_list};
