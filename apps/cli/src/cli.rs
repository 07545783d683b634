//! # CLI Argument Definitions
//!
//! One subcommand per storage operation, plus the global flags that select the
//! backend and configure logging.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use stow_logger::LevelFilter;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "stow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Store, inspect and restore backup objects")]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Args)]
pub(crate) struct GlobalArgs {
    /// Storage configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,

    /// Filesystem root; overrides the configured backend
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,

    /// Minimum level written to stderr and log files
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub(crate) log_level: LevelFilter,

    /// Directory for rolling log files
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) log_dir: Option<PathBuf>,

    /// Write log files as JSON lines
    #[arg(long, global = true, requires = "log_dir")]
    pub(crate) log_json: bool,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Store an object atomically, reading from a file or stdin
    Save {
        /// Object name
        name: String,
        /// Read content from this file instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Expected size in bytes (advisory)
        #[arg(long)]
        size_hint: Option<u64>,
    },
    /// Stream an object to a file or stdout
    Read {
        /// Object name
        name: String,
        /// Write content to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the name and size of an object as JSON
    Stat {
        /// Object name
        name: String,
    },
    /// List objects as a JSON array
    List {
        /// Only objects below this prefix
        #[arg(long, default_value = "")]
        prefix: String,
        /// Only names ending with this suffix
        #[arg(long, default_value = "")]
        suffix: String,
    },
    /// Copy an object to a new name
    Copy {
        /// Source object name
        src: String,
        /// Destination object name
        dst: String,
    },
    /// Delete an object, recursively for directories
    Delete {
        /// Object name
        name: String,
    },
    /// Print the configured backend type
    Kind {},
    /// Remove stale staging artifacts left by interrupted writes
    Purge {
        /// Only artifacts at least this old are removed
        #[arg(long, default_value_t = 300)]
        max_age_secs: u64,
    },
}
