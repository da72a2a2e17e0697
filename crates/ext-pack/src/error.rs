//! Error types for ext-pack

use std::path::PathBuf;

/// Result type for package reader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading packages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no entry {entry:?} in package {package}")]
    EntryNotFound { package: PathBuf, entry: String },

    #[error("not a usable package location: {0}")]
    InvalidLocation(PathBuf),

    #[error("failed to encode descriptor: {0}")]
    DescriptorEncode(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
