//! Registry of currently enabled extensions.

use std::collections::HashMap;

use crate::lifecycle::ExtensionHandle;

/// The set of loaded extensions, keyed by descriptor name.
///
/// Presence here is what "loaded" means: handles are inserted only after a
/// successful enable hook and leave on unload. Inserting a name that is
/// already present replaces the prior handle without disabling it.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<String, ExtensionHandle>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert a handle under its extension name, returning any displaced
    /// handle.
    pub(crate) fn insert(&mut self, handle: ExtensionHandle) -> Option<ExtensionHandle> {
        self.entries.insert(handle.name().to_string(), handle)
    }

    /// Remove and return the handle registered under `name`.
    pub(crate) fn remove(&mut self, name: &str) -> Option<ExtensionHandle> {
        self.entries.remove(name)
    }

    /// Look up an extension by name.
    pub fn get(&self, name: &str) -> Option<&ExtensionHandle> {
        self.entries.get(name)
    }

    /// Check if an extension is loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// List all loaded extension names (sorted).
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over the loaded handles in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ExtensionHandle> {
        self.entries.values()
    }

    /// Number of loaded extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
