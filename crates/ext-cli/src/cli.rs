//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extension Host - Inspect and preview extension package directories
#[derive(Parser, Debug)]
#[command(name = "exthost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Scan an extension directory and report what loads
    ///
    /// Every package is loaded with a stub in place of its entry point, so
    /// the report shows descriptor problems, dependency ordering, and what
    /// stays pending. The root and per-extension data directories are
    /// created exactly as a host would create them.
    ///
    /// Examples:
    ///   exthost scan                   # Scan ./extensions
    ///   exthost scan mods --suffix .mod
    ///   exthost scan --json            # Machine-readable report
    Scan {
        /// Directory to scan
        #[arg(default_value = "extensions")]
        root: PathBuf,

        /// Package suffix to look for (default ".ext")
        #[arg(short, long)]
        suffix: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the descriptor of a single extension package
    Inspect {
        /// Path to the package directory
        package: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
