//! The inspect command: print one package's descriptor.

use std::path::Path;

use colored::Colorize;
use ext_meta::{DESCRIPTOR_ENTRY, Descriptor};
use ext_pack::{DirectoryPackages, PackageReader};

use crate::error::{CliError, Result};

/// Run the inspect command
pub fn run_inspect(package: &Path, json: bool) -> Result<()> {
    let reader = DirectoryPackages::new();
    if !reader.contains(package, DESCRIPTOR_ENTRY) {
        return Err(CliError::user(format!(
            "{} is not an extension package (no {DESCRIPTOR_ENTRY})",
            package.display()
        )));
    }

    let bytes = reader.read(package, DESCRIPTOR_ENTRY)?;
    let descriptor = Descriptor::from_slice(&bytes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("{}", descriptor.name.bold());
    if let Some(description) = &descriptor.description {
        println!("  {description}");
    }
    println!("  {} {}", "entry point:".dimmed(), descriptor.entry_point);
    if descriptor.has_depends() {
        println!("  {} {}", "depends:".dimmed(), descriptor.depends.join(", "));
    }
    if !descriptor.authors.is_empty() {
        println!("  {} {}", "authors:".dimmed(), descriptor.authors.join(", "));
    }

    Ok(())
}
