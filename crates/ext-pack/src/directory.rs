//! Packages stored as directories on disk.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use ext_api::ExportTable;

use crate::error::{Error, Result};
use crate::reader::PackageReader;

/// Reader for packages laid out as directories.
///
/// A package is a directory (conventionally `<name>.ext`, see
/// [`PACKAGE_SUFFIX`](crate::PACKAGE_SUFFIX)) whose entries are plain files,
/// with the descriptor at the well-known metadata entry. Export tables
/// cannot live on disk, so the host registers them up front, keyed by the
/// package's directory name; a package nobody registered exports for reads
/// as an empty table.
#[derive(Debug, Default)]
pub struct DirectoryPackages {
    exports: HashMap<String, ExportTable>,
}

impl DirectoryPackages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the export table for the package directory named
    /// `package_name` (the on-disk name, suffix included).
    pub fn with_exports(mut self, package_name: impl Into<String>, table: ExportTable) -> Self {
        self.register_exports(package_name, table);
        self
    }

    /// Non-consuming form of [`with_exports`](Self::with_exports).
    pub fn register_exports(&mut self, package_name: impl Into<String>, table: ExportTable) {
        self.exports.insert(package_name.into(), table);
    }
}

impl PackageReader for DirectoryPackages {
    fn contains(&self, location: &Path, entry: &str) -> bool {
        location.join(entry).is_file()
    }

    fn read(&self, location: &Path, entry: &str) -> Result<Vec<u8>> {
        let path = location.join(entry);
        fs::read(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::EntryNotFound {
                    package: location.to_path_buf(),
                    entry: entry.to_string(),
                }
            } else {
                Error::io(path, e)
            }
        })
    }

    fn exports(&self, location: &Path) -> Result<ExportTable> {
        let name = location
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidLocation(location.to_path_buf()))?;
        match self.exports.get(name) {
            Some(table) => Ok(table.clone()),
            None => {
                tracing::debug!("no exports registered for package {name}");
                Ok(ExportTable::new())
            }
        }
    }
}
