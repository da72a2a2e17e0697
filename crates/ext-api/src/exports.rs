//! Export tables mapping entry-point identifiers to extension factories.
//!
//! A package exposes the types it can instantiate through an [`ExportTable`].
//! Factories are type-erased: they produce a boxed [`Any`] value that the
//! loading context then checks for extension shape, so a table can in
//! principle carry non-extension exports and the loader rejects them at
//! instantiation time rather than registration time.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{BoxError, Extension};

/// Type-erased extension factory stored in an export table.
///
/// The product must be a `Box<dyn Extension>` boxed again as `Any`; anything
/// else fails instantiation with a not-an-extension error.
pub type ConstructorFn = Arc<dyn Fn() -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync>;

/// Entry-point registry carried by one package.
///
/// Keys are the identifiers descriptors reference through `entry_point`.
/// Registering an identifier twice replaces the earlier factory.
#[derive(Clone, Default)]
pub struct ExportTable {
    entries: HashMap<String, ConstructorFn>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible factory for `entry_point`.
    pub fn register<E, F>(&mut self, entry_point: impl Into<String>, factory: F)
    where
        E: Extension + 'static,
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.register_fallible(entry_point, move || Ok(factory()));
    }

    /// Register a factory for `entry_point` whose construction can fail.
    ///
    /// A returned error surfaces as a construction failure for the extension
    /// being loaded.
    pub fn register_fallible<E, F>(&mut self, entry_point: impl Into<String>, factory: F)
    where
        E: Extension + 'static,
        F: Fn() -> Result<E, BoxError> + Send + Sync + 'static,
    {
        let constructor: ConstructorFn = Arc::new(move || {
            let extension: Box<dyn Extension> = Box::new(factory()?);
            Ok(Box::new(extension) as Box<dyn Any + Send>)
        });
        self.entries.insert(entry_point.into(), constructor);
    }

    /// Register a pre-erased constructor.
    ///
    /// Escape hatch for hosts that build constructors dynamically; the
    /// product is only shape-checked when a context instantiates it.
    pub fn register_raw(&mut self, entry_point: impl Into<String>, constructor: ConstructorFn) {
        self.entries.insert(entry_point.into(), constructor);
    }

    /// Look up the factory registered for `entry_point`.
    pub fn get(&self, entry_point: &str) -> Option<ConstructorFn> {
        self.entries.get(entry_point).cloned()
    }

    pub fn contains(&self, entry_point: &str) -> bool {
        self.entries.contains_key(entry_point)
    }

    /// All registered entry points, sorted for stable output.
    pub fn entry_points(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ExportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportTable")
            .field("entry_points", &self.entry_points())
            .finish()
    }
}
