//! Tuneshelf CLI application entry point
//!
//! This is the main executable for tuneshelf. It parses the command line, loads
//! the configuration and hands each command to the matching library operation,
//! then prints the resulting summary.
//!
//! # Usage
//!
//! ```bash
//! # Move everything in ~/incoming into ~/Music/<artist>/<album>/
//! tuneshelf organize ~/incoming ~/Music --clean
//!
//! # Preview without touching anything
//! tuneshelf organize ~/incoming ~/Music --dry-run
//!
//! # Set artist and artistsort on every mp3 in a folder
//! tuneshelf update ~/Music/Beatles --group artist --value "The Beatles"
//!
//! # Remove empty folders
//! tuneshelf clean ~/Music
//!
//! # Edit tags one file at a time
//! tuneshelf browse ~/Music
//! ```
//!
//! # Configuration
//!
//! Settings live in the user's config directory (`~/.config/tuneshelf/config.toml`
//! on Linux) and are created with defaults on first run. Logging goes to stderr
//! and follows `RUST_LOG`, falling back to the `-v` flags.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use colored::Colorize;
use dialoguer::{Input, Select};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tuneshelf::{
    TuneshelfError,
    cli::{Cli, Commands, ConfigCommands, FileFilter},
    commands::{
        self, BulkOpSummary, CleanMode, CollisionPolicy, ListFormat, MassUpdateOptions,
        MassUpdateOutcome, OrganizeOptions,
    },
    config::{PathFormat, TuneshelfConfig},
    library::{self, ExtensionSet, ScanOptions},
    output,
    session::{BrowseAction, Session},
    tags::{AudioStore, MetadataStore, TagKey, Track},
};

type Result<T> = std::result::Result<T, TuneshelfError>;

/// Settings resolved from the config file and global flags
struct Context {
    config: TuneshelfConfig,
    quiet: bool,
    path_format: PathFormat,
}

impl Context {
    fn show(&self, path: &Path) -> String {
        output::format_path(path, self.path_format)
    }

    fn scan_options(&self, filter: &FileFilter, fallback: ExtensionSet) -> ScanOptions {
        ScanOptions::with_extensions(filter.suffixes(&self.config.audio_extensions, fallback))
    }
}

fn install_subscriber(
    default_level: &str,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
}

/// Install the stderr subscriber; without one the command still runs, silently.
fn init_logging(default_level: &str) {
    if let Err(e) = install_subscriber(default_level) {
        eprintln!("{} logging disabled: {e}", "Warning:".yellow());
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(ctx: &Context, summary: &BulkOpSummary, operation: &str, json: bool) -> Result<()> {
    if json {
        return print_json(summary);
    }
    if ctx.quiet {
        return Ok(());
    }
    if summary.dry_run || summary.total() <= 50 {
        summary.print_outcomes(ctx.path_format);
    }
    summary.print(operation, ctx.path_format);
    Ok(())
}

/// Handle the scan command - list matching files, one per line
fn handle_scan_command(ctx: &Context, root: &Path, filter: &FileFilter, no_recurse: bool) -> Result<()> {
    let mut options = ctx.scan_options(filter, ExtensionSet::All);
    if no_recurse {
        options = options.shallow();
    }
    let files = library::scan(root, &options)?;
    for file in &files {
        println!("{}", ctx.show(file));
    }
    if !ctx.quiet {
        eprintln!("{} file(s)", files.len());
    }
    Ok(())
}

/// Handle the organize command
///
/// The destination falls back to `default_destination` from the config, then
/// to the source itself (organize in place).
fn handle_organize_command(
    ctx: &Context,
    source: &Path,
    destination: Option<PathBuf>,
    no_overwrite: bool,
    dry_run: bool,
    clean: bool,
    json: bool,
) -> Result<()> {
    let destination = destination
        .or_else(|| ctx.config.default_destination.clone())
        .unwrap_or_else(|| source.to_path_buf());
    let options = OrganizeOptions {
        collision: if no_overwrite {
            CollisionPolicy::Skip
        } else {
            ctx.config.collision
        },
        dry_run,
    };

    let summary = commands::organize(&AudioStore::new(), source, &destination, options)?;
    print_summary(ctx, &summary, "Organize", json)?;

    if clean && !dry_run {
        let report = commands::clean(source, ctx.config.clean_mode)?;
        if json {
            print_json(&report)?;
        } else if !ctx.quiet {
            report.print(ctx.path_format);
        }
    }
    Ok(())
}

/// Handle the move command - flat move from a scan or a list file
#[allow(clippy::too_many_arguments)]
fn handle_move_command(
    ctx: &Context,
    destination: &Path,
    source: &Path,
    filter: &FileFilter,
    list: Option<&Path>,
    format: ListFormat,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let files = match list {
        Some(list) => commands::read_file_list(list, format, source)?,
        None => library::scan(source, &ctx.scan_options(filter, ExtensionSet::All))?,
    };
    let summary = commands::move_all(destination, source, &files, dry_run)?;
    print_summary(ctx, &summary, "Move", json)
}

/// Handle the update command - confirm, then rewrite keys across the library
#[allow(clippy::too_many_arguments)]
fn handle_update_command(
    ctx: &Context,
    root: &Path,
    keys: &[TagKey],
    value: &str,
    filter: &FileFilter,
    dry_run: bool,
    yes: bool,
    json: bool,
) -> Result<()> {
    let options = MassUpdateOptions {
        extensions: filter.suffixes(&ctx.config.audio_extensions, ExtensionSet::Audio),
        dry_run,
    };

    if !value.trim().is_empty() && !dry_run && !yes && !ctx.quiet {
        let count = commands::mass_update::candidates(root, &options.extensions)?.len();
        let names: Vec<&str> = keys.iter().map(|k| k.name()).collect();
        let prompt = format!(
            "Set {} to '{}' on {count} file(s)?",
            names.join(", "),
            value.trim()
        );
        if !commands::confirm(&prompt)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match commands::mass_update(&AudioStore::new(), root, keys, value, &options)? {
        MassUpdateOutcome::NoOp => {
            if !ctx.quiet {
                println!("{}", "Value is blank; nothing to update.".yellow());
            }
            Ok(())
        }
        MassUpdateOutcome::Applied(summary) => print_summary(ctx, &summary, "Update", json),
    }
}

/// Handle the clean command
fn handle_clean_command(ctx: &Context, root: &Path, mode: Option<CleanMode>) -> Result<()> {
    let report = commands::clean(root, mode.unwrap_or(ctx.config.clean_mode))?;
    if ctx.quiet {
        for dir in &report.removed {
            println!("{}", ctx.show(dir));
        }
    } else {
        for dir in &report.removed {
            println!("{} {}", "✗".red(), ctx.show(dir));
        }
        report.print(ctx.path_format);
    }
    Ok(())
}

/// Handle the show command
fn handle_show_command(ctx: &Context, file: &Path, all: bool) -> Result<()> {
    let track = AudioStore::new().open(file)?;
    println!("{}", ctx.show(track.path()).bold());
    for line in output::track_lines(&track, all) {
        println!("{line}");
    }
    Ok(())
}

/// Handle the edit command - apply assignments and an optional rename
fn handle_edit_command(
    ctx: &Context,
    file: &Path,
    edits: &[(TagKey, String)],
    rename: Option<&str>,
) -> Result<()> {
    if edits.is_empty() && rename.is_none() {
        return Err(TuneshelfError::InvalidInput(
            "Nothing to do. Use --set KEY=VALUE or --rename NAME".into(),
        ));
    }
    let parent = file.parent().unwrap_or_else(|| Path::new("."));
    let mut session = Session::from_files(parent.to_path_buf(), vec![file.to_path_buf()]);
    let store = AudioStore::new();
    let mut track = store.open(file)?;
    session.save_current(&store, &mut track, edits, rename)?;

    if !ctx.quiet {
        println!("{} {}", "Saved".green(), ctx.show(track.path()));
    }
    Ok(())
}

fn prompt_err(e: dialoguer::Error) -> TuneshelfError {
    TuneshelfError::InvalidInput(format!("Prompt failed: {e}"))
}

/// Ask for a new value of each key, starting from the current one
fn prompt_edits(track: &Track, keys: &[TagKey]) -> Result<Vec<(TagKey, String)>> {
    let mut edits = Vec::with_capacity(keys.len());
    for key in keys {
        let input: String = Input::new()
            .with_prompt(key.name())
            .with_initial_text(track.get(*key).unwrap_or_default())
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err)?;
        edits.push((*key, input));
    }
    Ok(edits)
}

/// Handle the browse command - step through files and edit their tags
fn handle_browse_command(ctx: &Context, root: &Path, filter: &FileFilter) -> Result<()> {
    let store = AudioStore::new();
    let labels: Vec<&str> = BrowseAction::ALL.iter().map(|a| a.label()).collect();

    let mut session = Session::load(root, &ctx.scan_options(filter, ExtensionSet::Audio))?;
    if session.is_empty() {
        println!("No matching files under {}", ctx.show(root));
        return Ok(());
    }

    loop {
        let Some(mut track) = session.open_current(&store) else {
            println!("{}", "No readable files left.".yellow());
            return Ok(());
        };

        println!(
            "\n{} [{}/{}]",
            ctx.show(track.path()).bold(),
            session.position() + 1,
            session.len()
        );
        for line in output::track_lines(&track, false) {
            println!("{line}");
        }

        let choice = Select::new()
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_err)?;
        let action = BrowseAction::ALL.get(choice).copied().unwrap_or(BrowseAction::Quit);

        let result = match action {
            BrowseAction::Next => {
                session.advance();
                Ok(())
            }
            BrowseAction::Back => {
                session.retreat();
                Ok(())
            }
            BrowseAction::EditMain | BrowseAction::EditExtended => {
                let edits = prompt_edits(&track, &action.keys())?;
                session.save_current(&store, &mut track, &edits, None)
            }
            BrowseAction::Rename => {
                let name: String = Input::new()
                    .with_prompt("File name")
                    .with_initial_text(track.file_name().unwrap_or_default())
                    .interact_text()
                    .map_err(prompt_err)?;
                session.save_current(&store, &mut track, &[], Some(name.as_str()))
            }
            BrowseAction::Quit => return Ok(()),
        };

        if let Err(e) = result {
            eprintln!("{} {e}", "Error:".red());
        }
    }
}

/// Handle the keys command
fn handle_keys_command(all: bool) {
    for key in TagKey::ALL.iter().filter(|k| all || !k.is_vendor()) {
        let main = if TagKey::MAIN.contains(key) { "*" } else { " " };
        println!("{main} {:<28} {}", key.name(), key.kind().describe().dimmed());
    }
}

/// Handle config subcommands
fn handle_config_command(mut config: TuneshelfConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                TuneshelfError::InvalidInput("Invalid format. Use: tuneshelf config set key=value".into())
            })?;
            let key = key.trim();
            config.set_value(key, value.trim())?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get_value(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get_value(key.trim())?);
        }
        ConfigCommands::Show => {
            if !quiet {
                println!("# {}", TuneshelfConfig::config_path()?.display());
            }
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

/// Main entry point for the tuneshelf application
///
/// # Errors
///
/// Returns `TuneshelfError` if the configuration cannot be loaded, a root or
/// argument is invalid, or output cannot be produced. Per-file failures are
/// reported in summaries and do not fail the process.
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.log_level());

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "tuneshelf", &mut io::stdout());
        return Ok(());
    }

    let config = TuneshelfConfig::load()?;
    let quiet = cli.quiet || config.quiet;

    if let Commands::Config { command } = &cli.command {
        return handle_config_command(config, command, quiet);
    }

    let ctx = Context {
        path_format: cli.get_path_format().unwrap_or(config.path_format),
        quiet,
        config,
    };

    match &cli.command {
        Commands::Scan {
            root,
            filter,
            no_recurse,
        } => handle_scan_command(&ctx, root, filter, *no_recurse)?,
        Commands::Organize {
            source,
            destination,
            no_overwrite,
            dry_run,
            clean,
            json,
        } => handle_organize_command(
            &ctx,
            source,
            destination.clone(),
            *no_overwrite,
            *dry_run,
            *clean,
            *json,
        )?,
        Commands::Move {
            destination,
            source,
            filter,
            list,
            format,
            dry_run,
            json,
        } => handle_move_command(
            &ctx,
            destination,
            source,
            filter,
            list.as_deref(),
            *format,
            *dry_run,
            *json,
        )?,
        Commands::Update {
            root,
            value,
            filter,
            dry_run,
            yes,
            json,
            ..
        } => handle_update_command(
            &ctx,
            root,
            &cli.command.update_keys(),
            value,
            filter,
            *dry_run,
            *yes,
            *json,
        )?,
        Commands::Clean { root, mode } => handle_clean_command(&ctx, root, *mode)?,
        Commands::Show { file, all } => handle_show_command(&ctx, file, *all)?,
        Commands::Edit { file, set, rename } => {
            handle_edit_command(&ctx, file, set, rename.as_deref())?;
        }
        Commands::Browse { root, filter } => handle_browse_command(&ctx, root, filter)?,
        Commands::Keys { all } => handle_keys_command(*all),
        Commands::Config { .. } | Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
