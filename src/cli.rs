//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for tuneshelf using the `clap`
//! crate and the helpers `main` uses to turn parsed arguments into options for
//! the library operations.
//!
//! # Commands
//!
//! - **scan**: List files under a root matching an extension filter
//! - **organize**: Move files into `artist/album` folders from their tags
//! - **move**: Move a set of files flat into one directory
//! - **update**: Set tag keys to one value across a library
//! - **clean**: Remove empty directories
//! - **show** / **edit**: Inspect or change one file's tags
//! - **browse**: Step through a library and edit tags interactively
//! - **keys**, **config**, **completions**: Housekeeping
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use tuneshelf::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["tuneshelf", "clean", "/music"]);
//! assert!(matches!(cli.command, Commands::Clean { .. }));
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::commands::{CleanMode, ListFormat};
use crate::config::PathFormat;
use crate::library::ExtensionSet;
use crate::tags::{TagGroup, TagKey};

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tuneshelf")]
#[command(about = "Organize an audio library by its tags", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Display absolute paths (overrides config)
    #[arg(long = "absolute", global = true, conflicts_with = "relative")]
    pub absolute: bool,

    /// Display relative paths (overrides config)
    #[arg(long = "relative", global = true, conflicts_with = "absolute")]
    pub relative: bool,
}

/// Which files a command selects under its root
#[derive(Args, Debug, Clone, Default)]
pub struct FileFilter {
    /// Extension preset
    #[arg(short = 'k', long = "kind", value_enum, conflicts_with = "extensions")]
    pub kind: Option<ExtensionSet>,

    /// Filename suffix to include, e.g. `.flac` (repeatable)
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

impl FileFilter {
    /// Suffixes selected by the flags, or `fallback` if none were given
    #[must_use]
    pub fn suffixes(&self, configured: &[String], fallback: ExtensionSet) -> Vec<String> {
        if !self.extensions.is_empty() {
            return self.extensions.clone();
        }
        self.kind.unwrap_or(fallback).suffixes(configured)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List files under a root
    #[command(visible_alias = "ls")]
    Scan {
        /// Library root
        root: PathBuf,

        #[command(flatten)]
        filter: FileFilter,

        /// Only look at the root directory itself
        #[arg(long = "no-recurse")]
        no_recurse: bool,
    },

    /// Move every file into DEST/<artist>/<album>/ based on its tags
    #[command(visible_alias = "o")]
    Organize {
        /// Directory to read files from
        source: PathBuf,

        /// Library root to organize into (defaults to config, then SOURCE)
        destination: Option<PathBuf>,

        /// Keep existing files at the target instead of replacing them
        #[arg(long = "no-overwrite")]
        no_overwrite: bool,

        /// Show what would move without touching anything
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Remove directories left empty under SOURCE afterwards
        #[arg(long = "clean")]
        clean: bool,

        /// Print the summary as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Move files flat into DEST
    #[command(name = "move", visible_alias = "mv")]
    Move {
        /// Directory to move files into
        destination: PathBuf,

        /// Directory the files come from
        source: PathBuf,

        #[command(flatten)]
        filter: FileFilter,

        /// Read the files to move from a list instead of scanning SOURCE
        #[arg(short = 'l', long = "list", value_name = "FILE", conflicts_with_all = ["kind", "extensions"])]
        list: Option<PathBuf>,

        /// Format of the list file
        #[arg(long = "format", value_enum, default_value = "text", requires = "list")]
        format: ListFormat,

        /// Show what would move without touching anything
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Print the summary as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Set tag keys to one value on every audio file under ROOT
    #[command(visible_alias = "u")]
    Update {
        /// Library root
        root: PathBuf,

        /// Tag key to set (repeatable)
        #[arg(short = 'K', long = "key", value_name = "KEY", required_unless_present = "group")]
        keys: Vec<TagKey>,

        /// Set a key and its sort variant together
        #[arg(short = 'g', long = "group", value_enum, conflicts_with = "keys")]
        group: Option<TagGroup>,

        /// New value; sort keys drop a leading "The "
        #[arg(long = "value")]
        value: String,

        #[command(flatten)]
        filter: FileFilter,

        /// Show what would change without writing
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,

        /// Print the summary as JSON
        #[arg(long = "json")]
        json: bool,
    },

    /// Remove empty directories under ROOT
    #[command(visible_alias = "c")]
    Clean {
        /// Library root (never removed itself)
        root: PathBuf,

        /// Traversal strategy (defaults to config)
        #[arg(short = 'm', long = "mode", value_enum)]
        mode: Option<CleanMode>,
    },

    /// Show the tags of one file
    Show {
        file: PathBuf,

        /// Also show unset extended keys and vendor keys
        #[arg(short = 'a', long = "all")]
        all: bool,
    },

    /// Change the tags of one file
    #[command(visible_alias = "e")]
    Edit {
        file: PathBuf,

        /// Set a key; an empty value clears it (repeatable)
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(TagKey, String)>,

        /// New file name in the same directory
        #[arg(short = 'r', long = "rename", value_name = "NAME")]
        rename: Option<String>,
    },

    /// Step through a library and edit tags interactively
    #[command(visible_alias = "b")]
    Browse {
        /// Library root
        root: PathBuf,

        #[command(flatten)]
        filter: FileFilter,
    },

    /// List the tag keys tuneshelf understands
    Keys {
        /// Include vendor keys
        #[arg(short = 'a', long = "all")]
        all: bool,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., collision=skip)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., clean_mode)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the whole configuration and its location
    Show,
}

/// Parse `KEY=VALUE` into a tag key and raw value
///
/// # Errors
/// Returns a message if there is no `=` or the key is unknown.
pub fn parse_assignment(s: &str) -> Result<(TagKey, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim().parse::<TagKey>().map_err(|e| e.to_string())?;
    Ok((key, value.to_string()))
}

impl Commands {
    /// Keys an update command targets
    #[must_use]
    pub fn update_keys(&self) -> Vec<TagKey> {
        match self {
            Self::Update {
                group: Some(group), ..
            } => group.keys().to_vec(),
            Self::Update { keys, .. } => keys.clone(),
            _ => Vec::new(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Helper method to get the path format override from global flags
    #[must_use]
    pub const fn get_path_format(&self) -> Option<PathFormat> {
        if self.absolute {
            Some(PathFormat::Absolute)
        } else if self.relative {
            Some(PathFormat::Relative)
        } else {
            None
        }
    }

    /// Default log filter for the verbosity flags
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organize() {
        let cli = Cli::parse_from(["tuneshelf", "organize", "in", "lib", "--no-overwrite", "-n"]);
        match cli.command {
            Commands::Organize {
                source,
                destination,
                no_overwrite,
                dry_run,
                clean,
                json,
            } => {
                assert_eq!(source, PathBuf::from("in"));
                assert_eq!(destination, Some(PathBuf::from("lib")));
                assert!(no_overwrite);
                assert!(dry_run);
                assert!(!clean);
                assert!(!json);
            }
            _ => panic!("Expected Organize command"),
        }
    }

    #[test]
    fn test_organize_destination_optional() {
        let cli = Cli::parse_from(["tuneshelf", "o", "in"]);
        assert!(matches!(
            cli.command,
            Commands::Organize {
                destination: None,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_update_with_keys() {
        let cli = Cli::parse_from([
            "tuneshelf", "update", "/music", "--key", "artist", "--key", "ARTISTSORT", "--value",
            "The Beatles",
        ]);
        assert_eq!(
            cli.command.update_keys(),
            vec![TagKey::Artist, TagKey::ArtistSort]
        );
    }

    #[test]
    fn test_parse_update_with_group() {
        let cli = Cli::parse_from([
            "tuneshelf", "update", "/music", "--group", "album", "--value", "Help!", "-y",
        ]);
        assert_eq!(cli.command.update_keys(), vec![TagKey::Album, TagKey::AlbumSort]);
    }

    #[test]
    fn test_update_requires_key_or_group() {
        assert!(Cli::try_parse_from(["tuneshelf", "update", "/m", "--value", "x"]).is_err());
        assert!(
            Cli::try_parse_from(["tuneshelf", "update", "/m", "--key", "nope", "--value", "x"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_move_with_list() {
        let cli = Cli::parse_from([
            "tuneshelf", "move", "dst", "src", "--list", "files.csv", "--format", "csv",
        ]);
        match cli.command {
            Commands::Move { list, format, .. } => {
                assert_eq!(list, Some(PathBuf::from("files.csv")));
                assert_eq!(format, ListFormat::Csv);
            }
            _ => panic!("Expected Move command"),
        }
        assert!(
            Cli::try_parse_from(["tuneshelf", "move", "d", "s", "--list", "f", "--kind", "mp3"])
                .is_err()
        );
    }

    #[test]
    fn test_file_filter_suffixes() {
        let configured = vec![".mp3".to_string(), ".flac".to_string()];
        let filter = FileFilter::default();
        assert_eq!(filter.suffixes(&configured, ExtensionSet::Audio), configured);

        let filter = FileFilter {
            kind: Some(ExtensionSet::Mp4),
            extensions: Vec::new(),
        };
        assert_eq!(filter.suffixes(&configured, ExtensionSet::Audio), vec![".mp4", ".m4a"]);

        let filter = FileFilter {
            kind: None,
            extensions: vec![".ogg".to_string()],
        };
        assert_eq!(filter.suffixes(&configured, ExtensionSet::All), vec![".ogg"]);
    }

    #[test]
    fn test_parse_edit_assignments() {
        let cli = Cli::parse_from([
            "tuneshelf", "edit", "a.mp3", "--set", "title=Song 2", "--set", "genre=",
        ]);
        match cli.command {
            Commands::Edit { set, rename, .. } => {
                assert_eq!(
                    set,
                    vec![
                        (TagKey::Title, "Song 2".to_string()),
                        (TagKey::Genre, String::new())
                    ]
                );
                assert!(rename.is_none());
            }
            _ => panic!("Expected Edit command"),
        }
        assert!(parse_assignment("title").is_err());
        assert!(parse_assignment("bogus=1").is_err());
    }

    #[test]
    fn test_clean_mode_flag() {
        let cli = Cli::parse_from(["tuneshelf", "clean", "/m", "--mode", "fixed-point"]);
        assert!(matches!(
            cli.command,
            Commands::Clean {
                mode: Some(CleanMode::FixedPoint),
                ..
            }
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["tuneshelf", "-vv", "keys", "--relative"]);
        assert_eq!(cli.log_level(), "debug");
        assert_eq!(cli.get_path_format(), Some(PathFormat::Relative));
        assert!(Cli::try_parse_from(["tuneshelf", "keys", "--absolute", "--relative"]).is_err());
    }
}
