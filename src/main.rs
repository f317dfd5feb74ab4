#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use mcpreg::{
    cli::{Cli, Commands},
    config::writer,
    paths,
    registry::{AlwaysConfirm, ConfirmPolicy, Direction, RegistryStore},
    AddOutcome, ServerEntry,
};
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.debug, cli.trace);

    dispatch_command(cli.command)
}

/// Initialize tracing with the specified debug/trace flags
fn initialize_tracing(debug: bool, trace: bool) {
    let log_level = if trace {
        Level::TRACE
    } else if debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(log_level.into()).from_env_lossy())
        .init();
}

/// Dispatch to the appropriate command handler
fn dispatch_command(command: Commands) -> Result<()> {
    match command {
        Commands::Merge { file } => run_merge(file),
        Commands::Add { json, file, backup } => run_add(json, file, backup),
        Commands::List { query, file } => run_list(query, file),
        Commands::Remove { name, yes, file, backup } => run_remove(&name, yes, file, backup),
        Commands::Move { name, direction, file } => run_move(&name, direction, file),
    }
}

/// Resolve an explicit path or fall back to the global registry location.
fn resolve_target(file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => paths::default_registry_path(),
    }
}

fn run_merge(file: Option<PathBuf>) -> Result<()> {
    let path = resolve_target(file)?;
    let mut store = RegistryStore::new(&path);

    match store.merge_in_place() {
        Ok(()) => {
            println!(
                "Merged {} into {} server entr{}",
                path.display(),
                store.registry().len(),
                if store.registry().len() == 1 { "y" } else { "ies" }
            );
            Ok(())
        },
        Err(e) => {
            error!("Failed to merge {}: {e:#}", path.display());
            std::process::exit(1);
        },
    }
}

fn run_add(json: Option<String>, file: Option<PathBuf>, backup: bool) -> Result<()> {
    let input = read_fragment_input(json)?;

    // Host contract: the fragment must be parseable JSON before it reaches
    // the store
    let fragment: Value = serde_json::from_str(input.trim())
        .context("Input is not valid JSON; check the fragment and try again")?;

    let path = resolve_target(file)?;
    handle_backup(backup, &path)?;

    let mut store = RegistryStore::new(&path);
    match store.add(&fragment)? {
        AddOutcome::Merged => {
            println!("Added to {} ({} server entries)", path.display(), store.registry().len());
        },
        AddOutcome::AppendedRaw => {
            println!(
                "Could not merge with the existing content of {}; appended the fragment as-is",
                path.display()
            );
        },
    }

    Ok(())
}

/// Use the operand, or read the whole of stdin when it is absent or `-`.
fn read_fragment_input(json: Option<String>) -> Result<String> {
    match json {
        Some(text) if text != "-" => Ok(text),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read JSON fragment from stdin")?;
            Ok(buffer)
        },
    }
}

fn run_list(query: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let path = resolve_target(file)?;
    let mut store = RegistryStore::open(&path)
        .with_context(|| format!("Failed to load registry from {}", path.display()))?;

    store.set_filter(query.as_deref().unwrap_or(""));

    let visible = store.visible();
    if visible.is_empty() {
        println!("No server entries");
        return Ok(());
    }

    for (name, value) in visible {
        match ServerEntry::from_value(value) {
            Some(entry) => println!("  {name}  {}", format_entry(&entry)),
            None => println!("  {name}"),
        }
    }

    Ok(())
}

fn format_entry(entry: &ServerEntry) -> String {
    let command = entry.command.as_deref().unwrap_or("(no command)");
    if entry.args.is_empty() {
        command.to_string()
    } else {
        format!("{command} {}", entry.args.join(" "))
    }
}

fn run_remove(name: &str, yes: bool, file: Option<PathBuf>, backup: bool) -> Result<()> {
    let path = resolve_target(file)?;
    let mut store = RegistryStore::open(&path)
        .with_context(|| format!("Failed to load registry from {}", path.display()))?;

    handle_backup(backup, &path)?;

    let deleted = if yes {
        store.delete(name, &AlwaysConfirm)?
    } else {
        store.delete(name, &PromptConfirm)?
    };

    if deleted {
        println!("Removed '{name}' from {}", path.display());
    } else {
        println!("Cancelled; '{name}' was not removed");
    }

    Ok(())
}

fn run_move(name: &str, direction: Direction, file: Option<PathBuf>) -> Result<()> {
    let path = resolve_target(file)?;
    let mut store = RegistryStore::open(&path)
        .with_context(|| format!("Failed to load registry from {}", path.display()))?;

    store.move_entry(name, direction)?;

    println!("New order: {}", store.registry().names().join(", "));
    Ok(())
}

fn handle_backup(backup: bool, path: &std::path::Path) -> Result<()> {
    if backup {
        if let Some(backup_path) = writer::backup_file(path)? {
            println!("Created backup: {backup_path}");
        }
    }
    Ok(())
}

/// Interactive y/N gate for deletions.
struct PromptConfirm;

impl ConfirmPolicy for PromptConfirm {
    fn confirm(&self, name: &str) -> Result<bool> {
        use std::io::{self, Write};

        print!("Remove server '{name}'? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        Ok(input.trim().eq_ignore_ascii_case("y"))
    }
}
