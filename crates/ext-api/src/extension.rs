//! The lifecycle contract implemented by every extension.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ext_meta::Descriptor;

use crate::BoxError;

/// Execution parameters attached to an extension before any hook runs.
///
/// Carries the decoded descriptor, the extension's private data directory
/// (`<loader root>/<name>`), and the location of the package it was loaded
/// from. The loader attaches this exactly once per load, after construction
/// and before `on_enable`; attaching again replaces the previous value.
#[derive(Debug, Clone)]
pub struct ExtensionContext {
    descriptor: Arc<Descriptor>,
    data_dir: PathBuf,
    package: PathBuf,
}

impl ExtensionContext {
    pub fn new(descriptor: Arc<Descriptor>, data_dir: PathBuf, package: PathBuf) -> Self {
        Self {
            descriptor,
            data_dir,
            package,
        }
    }

    /// The descriptor decoded from the package's metadata entry.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The extension's name, as declared in its descriptor.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Private data directory reserved for this extension.
    ///
    /// Created by the loader before the enable hook runs; never cleaned up
    /// automatically.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the package this extension was loaded from.
    pub fn package(&self) -> &Path {
        &self.package
    }
}

/// An extension instance driven by the loader.
///
/// All methods have default implementations so a unit struct is already a
/// valid (inert) extension. Implementors that need their descriptor or data
/// directory store the [`ExtensionContext`] handed to [`attach`].
///
/// [`attach`]: Extension::attach
pub trait Extension: Send {
    /// Receives the execution parameters for this instance.
    ///
    /// Runs after construction and before [`on_enable`]; never called again
    /// for the same load, except by an idempotent re-initialization where
    /// the last attachment wins.
    ///
    /// [`on_enable`]: Extension::on_enable
    fn attach(&mut self, context: ExtensionContext) {
        let _ = context;
    }

    /// Called once when the loader enables this extension.
    ///
    /// Returning an error abandons the load: the extension is not added to
    /// the registry and the failure is reported on the host log sink.
    fn on_enable(&mut self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Called once when the loader disables this extension.
    fn on_disable(&mut self) {}
}

impl std::fmt::Debug for dyn Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Extension")
    }
}
