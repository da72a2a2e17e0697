//! The scan command: load a directory with stub entry points and report.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use ext_api::{ExportTable, Extension, LogSink};
use ext_core::ExtensionLoader;
use ext_meta::{DESCRIPTOR_ENTRY, Descriptor};
use ext_pack::{DirectoryPackages, PackageReader};
use parking_lot::Mutex;

use crate::error::Result;

/// Keeps every loader message so the report can show it.
#[derive(Clone, Default)]
struct CollectedLog(Arc<Mutex<Vec<String>>>);

impl CollectedLog {
    fn messages(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

impl LogSink for CollectedLog {
    fn log(&self, message: &str) {
        self.0.lock().push(message.to_string());
    }
}

struct Stub;

impl Extension for Stub {}

/// Directory reader that pretends every descriptor's entry point exists.
///
/// Real hosts register export tables for the packages they ship; the CLI
/// has no extension code, so it synthesizes a table per package with a
/// stub under whatever entry point the descriptor names. Descriptor and
/// dependency problems still surface exactly as they would in a host.
struct StubPackages {
    inner: DirectoryPackages,
}

impl StubPackages {
    fn new() -> Self {
        Self {
            inner: DirectoryPackages::new(),
        }
    }
}

impl PackageReader for StubPackages {
    fn contains(&self, location: &Path, entry: &str) -> bool {
        self.inner.contains(location, entry)
    }

    fn read(&self, location: &Path, entry: &str) -> ext_pack::Result<Vec<u8>> {
        self.inner.read(location, entry)
    }

    fn exports(&self, location: &Path) -> ext_pack::Result<ExportTable> {
        let mut table = ExportTable::new();
        if !self.inner.contains(location, DESCRIPTOR_ENTRY) {
            return Ok(table);
        }
        let bytes = self.inner.read(location, DESCRIPTOR_ENTRY)?;
        if let Ok(descriptor) = Descriptor::from_slice(&bytes) {
            table.register(descriptor.entry_point, || Stub);
        }
        Ok(table)
    }
}

/// Run the scan command
pub fn run_scan(root: &Path, suffix: Option<&str>, json: bool) -> Result<()> {
    let log = CollectedLog::default();
    let mut loader =
        ExtensionLoader::new(root, StubPackages::new()).with_log_sink(log.clone());
    if let Some(suffix) = suffix {
        loader = loader.with_package_suffix(suffix);
    }
    loader.scan()?;

    if json {
        return print_json(&loader, &log);
    }
    print_report(&loader, &log);
    Ok(())
}

fn print_json(loader: &ExtensionLoader, log: &CollectedLog) -> Result<()> {
    let loaded: Vec<_> = loader
        .registry()
        .names()
        .into_iter()
        .filter_map(|name| loader.get(name))
        .map(|handle| {
            serde_json::json!({
                "name": handle.name(),
                "entry_point": handle.descriptor().entry_point,
                "depends": handle.descriptor().depends,
                "data_dir": handle.data_dir().display().to_string(),
            })
        })
        .collect();
    let pending: Vec<_> = loader
        .pending()
        .iter()
        .map(|entry| {
            serde_json::json!({
                "name": entry.name(),
                "missing": entry.missing(loader.registry()),
            })
        })
        .collect();

    let report = serde_json::json!({
        "root": loader.root().display().to_string(),
        "loaded": loaded,
        "pending": pending,
        "messages": log.messages(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_report(loader: &ExtensionLoader, log: &CollectedLog) {
    println!("{} {}", "Scanned".bold(), loader.root().display());
    println!();

    let names = loader.registry().names();
    if !names.is_empty() {
        println!("{}:", "Loaded".green().bold());
        for name in &names {
            if let Some(handle) = loader.get(name) {
                let descriptor = handle.descriptor();
                if descriptor.depends.is_empty() {
                    println!("  {:<16} {}", name.green(), descriptor.entry_point.dimmed());
                } else {
                    println!(
                        "  {:<16} {} (depends: {})",
                        name.green(),
                        descriptor.entry_point.dimmed(),
                        descriptor.depends.join(", ")
                    );
                }
            }
        }
        println!();
    }

    if !loader.pending().is_empty() {
        println!("{}:", "Pending".yellow().bold());
        for entry in loader.pending().iter() {
            println!(
                "  {:<16} waiting on {}",
                entry.name().yellow(),
                entry.missing(loader.registry()).join(", ")
            );
        }
        println!();
    }

    let messages = log.messages();
    if !messages.is_empty() {
        println!("{}:", "Reported".red().bold());
        for message in &messages {
            println!("  {message}");
        }
        println!();
    }

    println!(
        "{} {} loaded, {} pending.",
        "Total:".dimmed(),
        names.len(),
        loader.pending().len()
    );
}
