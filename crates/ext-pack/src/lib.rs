//! Package readers for Extension Host.
//!
//! A package is a self-contained unit of extension code plus its metadata
//! entry. The loader never touches package contents directly; it goes
//! through the [`PackageReader`] trait, which answers "does entry X exist",
//! "read entry X", and "what does this package export". Two readers are
//! provided: [`DirectoryPackages`] for packages laid out as directories on
//! disk, and [`MemoryPackages`] for embedders and tests.

pub mod directory;
pub mod error;
pub mod memory;
pub mod reader;

/// Suffix that marks a directory entry as an extension package.
///
/// The loader only considers children of its root directory whose file name
/// ends with this suffix (overridable per loader).
pub const PACKAGE_SUFFIX: &str = ".ext";

pub use directory::DirectoryPackages;
pub use error::{Error, Result};
pub use memory::{MemoryPackage, MemoryPackages};
pub use reader::PackageReader;
