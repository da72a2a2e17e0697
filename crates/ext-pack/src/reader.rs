//! The reader contract the loader consumes packages through.

use std::path::Path;

use ext_api::ExportTable;

use crate::error::Result;

/// Read-only access to extension packages at opaque locations.
///
/// The loader asks for exactly one well-known metadata entry
/// ([`ext_meta::DESCRIPTOR_ENTRY`]) plus the package's export table; it
/// never enumerates package contents. Locations come from the loader's
/// directory scan or directly from an embedder and are meaningful only to
/// the reader that issued or accepted them.
pub trait PackageReader: Send {
    /// Whether the package at `location` contains `entry`.
    fn contains(&self, location: &Path, entry: &str) -> bool;

    /// Read the raw bytes of `entry` from the package at `location`.
    fn read(&self, location: &Path, entry: &str) -> Result<Vec<u8>>;

    /// The export table of the package at `location`.
    ///
    /// A package with no registered exports yields an empty table; its
    /// descriptor can still name an entry point satisfied further up the
    /// resolver chain.
    fn exports(&self, location: &Path) -> Result<ExportTable>;
}
