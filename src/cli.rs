use crate::registry::Direction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mcpreg",
    about = "MCP server registry tool - merge, add, and reorder server configurations",
    long_about = "mcpreg accumulates MCP server configuration fragments into a single
canonical registry file, even when the source text is malformed, contains
multiple concatenated JSON objects, or stray // comments.

The registry file has the shape:
  { \"servers\": { \"<name>\": { \"command\": ..., \"args\": [...], \"env\": {...} } } }

The implicit global registry lives at:
  • $XDG_CONFIG_HOME/mcpreg/registry.json (or ~/.config/mcpreg/registry.json)

Every command also accepts an explicit --file to operate on any registry.",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long, global = true)]
    pub trace: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract and merge every JSON object in a registry file in place
    #[command(long_about = "Extract and merge every JSON object in a registry file in place.

Two extraction strategies run in order: a nested-brace pattern matcher that
also strips // line comments, then a line-oriented brace counter for content
the pattern cannot handle. All valid objects found are folded left to right
(later objects win conflicts, args arrays replace rather than concatenate)
and the file is rewritten as one pretty-printed document.

Examples:
  # Canonicalize the global registry
  mcpreg merge

  # Canonicalize a project-local file
  mcpreg merge ./registry.json")]
    Merge {
        /// Registry file to merge (defaults to the global registry)
        #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Add a JSON fragment to a registry, merging it with existing entries
    #[command(long_about = "Add a JSON fragment to a registry, merging it with existing entries.

The fragment must be valid JSON. It is folded into the target file through
the same pipeline as loading: a clean single-object file is merged directly;
a degraded file goes through the extraction strategies first. If nothing can
be merged, the fragment is appended after the existing content as raw text
so your input is never lost.

Examples:
  # Paste a fragment into the global registry
  mcpreg add '{\"servers\": {\"fetch\": {\"command\": \"npx\", \"args\": [\"-y\", \"fetch-server\"]}}}'

  # Read the fragment from stdin
  cat fragment.json | mcpreg add

  # Add to a specific file, keeping a timestamped backup
  mcpreg add --file ./registry.json --backup '{\"servers\": {\"db\": {\"command\": \"db-server\"}}}'")]
    Add {
        /// JSON fragment to add; reads stdin when absent or '-'
        #[arg(value_name = "JSON")]
        json: Option<String>,

        /// Registry file to add to (defaults to the global registry)
        #[arg(short, long, env = "MCPREG_FILE", value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Create timestamped backup of the registry before making changes
        #[arg(short, long)]
        backup: bool,
    },

    /// List server entries in registry order
    #[command(long_about = "List server entries in registry order.

With --query, only entries whose name or command contains the query
(case-insensitive) are shown; the underlying order is never changed.

Examples:
  mcpreg list
  mcpreg list --query fetch
  mcpreg list --file ./registry.json")]
    List {
        /// Case-insensitive substring filter on name or command
        #[arg(short, long, value_name = "QUERY")]
        query: Option<String>,

        /// Registry file to list (defaults to the global registry)
        #[arg(short, long, env = "MCPREG_FILE", value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Remove a named server entry from a registry
    #[command(long_about = "Remove a named server entry from a registry.

Asks for confirmation unless --yes is given; a declined prompt leaves the
file untouched. The remaining entries keep their relative order.

Examples:
  mcpreg remove fetch
  mcpreg remove fetch --yes --backup
  mcpreg remove db --file ./registry.json")]
    Remove {
        /// Name of the server entry to remove
        #[arg(value_name = "NAME")]
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Registry file to modify (defaults to the global registry)
        #[arg(short, long, env = "MCPREG_FILE", value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,

        /// Create timestamped backup of the registry before making changes
        #[arg(short, long)]
        backup: bool,
    },

    /// Move a named server entry up or down in the registry order
    #[command(long_about = "Move a named server entry up or down in the registry order.

Moving the first entry up (or the last entry down) is reported as a failure
and leaves the file unchanged.

Examples:
  mcpreg move fetch up
  mcpreg move db down --file ./registry.json")]
    Move {
        /// Name of the server entry to move
        #[arg(value_name = "NAME")]
        name: String,

        /// Direction to move the entry
        #[arg(value_enum, value_name = "DIRECTION")]
        direction: Direction,

        /// Registry file to modify (defaults to the global registry)
        #[arg(short, long, env = "MCPREG_FILE", value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
}
