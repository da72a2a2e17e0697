//! In-memory packages for embedders and tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ext_api::ExportTable;
use ext_meta::{DESCRIPTOR_ENTRY, Descriptor};

use crate::error::Result;
use crate::reader::PackageReader;

/// One in-memory package: named byte entries plus an export table.
#[derive(Debug, Default)]
pub struct MemoryPackage {
    entries: HashMap<String, Vec<u8>>,
    exports: ExportTable,
}

impl MemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw entry.
    pub fn with_entry(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(name.into(), bytes.into());
        self
    }

    /// Add the descriptor under the well-known metadata entry name.
    pub fn with_descriptor(self, descriptor: &Descriptor) -> Result<Self> {
        let bytes = serde_json::to_vec(descriptor)?;
        Ok(self.with_entry(DESCRIPTOR_ENTRY, bytes))
    }

    /// Set the package's export table.
    pub fn with_exports(mut self, exports: ExportTable) -> Self {
        self.exports = exports;
        self
    }
}

/// Reader over a fixed set of in-memory packages.
///
/// Locations are plain keys with no filesystem meaning; an embedder that
/// ships its extensions compiled in can hand the loader virtual locations
/// like `builtin/chat.ext`. Reading from an unknown location behaves like a
/// package without the requested entry.
#[derive(Debug, Default)]
pub struct MemoryPackages {
    packages: HashMap<PathBuf, MemoryPackage>,
}

impl MemoryPackages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, location: impl Into<PathBuf>, package: MemoryPackage) -> Self {
        self.packages.insert(location.into(), package);
        self
    }

    /// All package locations, sorted for stable output.
    pub fn locations(&self) -> Vec<&Path> {
        let mut locations: Vec<&Path> = self.packages.keys().map(PathBuf::as_path).collect();
        locations.sort_unstable();
        locations
    }
}

impl PackageReader for MemoryPackages {
    fn contains(&self, location: &Path, entry: &str) -> bool {
        self.packages
            .get(location)
            .is_some_and(|p| p.entries.contains_key(entry))
    }

    fn read(&self, location: &Path, entry: &str) -> Result<Vec<u8>> {
        self.packages
            .get(location)
            .and_then(|p| p.entries.get(entry))
            .cloned()
            .ok_or_else(|| crate::Error::EntryNotFound {
                package: location.to_path_buf(),
                entry: entry.to_string(),
            })
    }

    fn exports(&self, location: &Path) -> Result<ExportTable> {
        Ok(self
            .packages
            .get(location)
            .map(|p| p.exports.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use ext_api::Extension;
    use pretty_assertions::assert_eq;

    use super::*;

    struct Null;

    impl Extension for Null {}

    fn chat_descriptor() -> Descriptor {
        Descriptor::from_json(r#"{"name": "chat", "entry_point": "chat::Chat"}"#).unwrap()
    }

    #[test]
    fn test_descriptor_entry_round_trips() {
        let reader = MemoryPackages::new().with_package(
            "builtin/chat.ext",
            MemoryPackage::new().with_descriptor(&chat_descriptor()).unwrap(),
        );

        let location = Path::new("builtin/chat.ext");
        assert!(reader.contains(location, DESCRIPTOR_ENTRY));

        let bytes = reader.read(location, DESCRIPTOR_ENTRY).unwrap();
        let decoded = Descriptor::from_slice(&bytes).unwrap();
        assert_eq!(decoded, chat_descriptor());
    }

    #[test]
    fn test_unknown_location_is_empty() {
        let reader = MemoryPackages::new();
        let location = Path::new("builtin/ghost.ext");

        assert!(!reader.contains(location, DESCRIPTOR_ENTRY));
        assert!(reader.read(location, DESCRIPTOR_ENTRY).is_err());
        assert!(reader.exports(location).unwrap().is_empty());
    }

    #[test]
    fn test_exports_attached_to_package() {
        let mut table = ExportTable::new();
        table.register("chat::Chat", || Null);

        let reader = MemoryPackages::new().with_package(
            "builtin/chat.ext",
            MemoryPackage::new().with_exports(table),
        );

        let exports = reader.exports(Path::new("builtin/chat.ext")).unwrap();
        assert!(exports.contains("chat::Chat"));
    }

    #[test]
    fn test_locations_sorted() {
        let reader = MemoryPackages::new()
            .with_package("b.ext", MemoryPackage::new())
            .with_package("a.ext", MemoryPackage::new());

        assert_eq!(reader.locations(), vec![Path::new("a.ext"), Path::new("b.ext")]);
    }
}
