//! Extension Host CLI
//!
//! Command-line tooling for inspecting extension packages and previewing
//! what a host would load from an extension directory.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Scan { root, suffix, json }) => {
            commands::run_scan(&root, suffix.as_deref(), json)
        }
        Some(Commands::Inspect { package, json }) => commands::run_inspect(&package, json),
        None => {
            println!("{} Extension Host CLI", "exthost".green().bold());
            println!();
            println!("Run {} for available commands.", "exthost --help".cyan());
            Ok(())
        }
    }
}
