//! Error types for ext-core

use std::path::PathBuf;

use ext_api::BoxError;

use crate::lifecycle::LifecycleState;

/// Result type for ext-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading and driving extensions.
///
/// None of these is fatal to the loader itself; scan and drain contain every
/// per-extension failure and keep going.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No extension with this name is currently in the registry.
    #[error("extension '{name}' is not loaded")]
    NotLoaded { name: String },

    /// The entry point resolved neither in the package's own export table
    /// nor anywhere up the parent chain.
    #[error("entry point {entry_point:?} for extension '{name}' not found in this context or its parents")]
    EntryPointNotFound { name: String, entry_point: String },

    /// The entry point resolved, but its factory produced something that is
    /// not an extension.
    #[error("entry point {entry_point:?} for extension '{name}' did not produce an extension")]
    NotAnExtension { name: String, entry_point: String },

    /// The extension's own factory returned an error.
    #[error("construction of extension '{name}' failed: {source}")]
    ConstructionFailed {
        name: String,
        #[source]
        source: BoxError,
    },

    /// An instance was handed to a loading context that did not create it.
    #[error("extension '{name}' was not created by this loading context")]
    WrongContext { name: String },

    /// The extension's enable hook returned an error.
    #[error("enable hook of extension '{name}' failed: {source}")]
    EnableFailed {
        name: String,
        #[source]
        source: BoxError,
    },

    /// A lifecycle step was requested from a state it cannot run in.
    #[error("cannot enable extension '{name}' from state {state}")]
    InvalidTransition { name: String, state: LifecycleState },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Descriptor error from ext-meta
    #[error(transparent)]
    Meta(#[from] ext_meta::Error),

    /// Package reader error from ext-pack
    #[error(transparent)]
    Pack(#[from] ext_pack::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
