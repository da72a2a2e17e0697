//! Extension contract for Extension Host.
//!
//! This crate defines the surface extension authors target: the
//! [`Extension`] trait with its lifecycle hooks, the [`ExtensionContext`]
//! attachment value, the [`ExportTable`] a package uses to expose entry
//! points, and the [`LogSink`] channel the host receives loader messages on.

pub mod extension;
pub mod exports;
pub mod log;

/// Boxed error type carried out of extension hooks and factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub use extension::{Extension, ExtensionContext};
pub use exports::{ConstructorFn, ExportTable};
pub use log::{LogSink, TracingSink};
