//! Descriptor model and decoding for Extension Host.
//!
//! This crate provides the [`Descriptor`] value decoded from a package's
//! metadata entry, together with validation of the fields the loader
//! relies on.

pub mod descriptor;
pub mod error;

/// The canonical name of the metadata entry inside an extension package.
///
/// Packages must carry an entry with this name for the loader to consider
/// them valid; packages without it are skipped during a scan.
pub const DESCRIPTOR_ENTRY: &str = "extension.json";

pub use descriptor::Descriptor;
pub use error::{Error, Result};
