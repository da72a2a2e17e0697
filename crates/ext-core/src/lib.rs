//! Core loading pipeline for Extension Host.
//!
//! This crate ties the collaborator crates together into the loader proper:
//!
//! - [`context`] — isolated loading contexts and the entry-point resolver
//!   chain each context delegates missed lookups through.
//! - [`lifecycle`] — per-extension handles driving the
//!   constructed/initialized/enabled/disabled progression.
//! - [`registry`] — the set of currently enabled extensions, keyed by name.
//! - [`pending`] — the queue of extensions whose dependencies are not
//!   satisfied yet.
//! - [`loader`] — [`ExtensionLoader`], which scans a package directory,
//!   decides immediate-load vs. pending, and drains the queue as the
//!   registry grows.
//!
//! A failure while loading one extension never takes the loader down; it is
//! reported on the host log sink and the scan moves on.

pub mod context;
pub mod error;
pub mod lifecycle;
pub mod loader;
pub mod pending;
pub mod registry;

pub use context::{EntryPointResolver, LoadContext, SharedExtension};
pub use error::{Error, Result};
pub use lifecycle::{ExtensionHandle, LifecycleState};
pub use loader::ExtensionLoader;
pub use pending::{PendingExtension, PendingQueue};
pub use registry::Registry;
