//! Queue of extensions waiting for their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ext_meta::Descriptor;

use crate::registry::Registry;

/// One queued extension: its descriptor, where its package lives, and the
/// dependency names still gating it.
#[derive(Debug, Clone)]
pub struct PendingExtension {
    descriptor: Arc<Descriptor>,
    location: PathBuf,
    depends: Vec<String>,
}

impl PendingExtension {
    pub(crate) fn new(descriptor: Arc<Descriptor>, location: PathBuf) -> Self {
        let depends = descriptor.depends.clone();
        Self {
            descriptor,
            location,
            depends,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub(crate) fn descriptor_arc(&self) -> Arc<Descriptor> {
        self.descriptor.clone()
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    /// Dependency names not yet present in the registry.
    pub fn missing<'a>(&'a self, registry: &Registry) -> Vec<&'a str> {
        self.depends
            .iter()
            .map(String::as_str)
            .filter(|name| !registry.contains(name))
            .collect()
    }

    /// Whether every declared dependency is registered.
    pub(crate) fn is_ready(&self, registry: &Registry) -> bool {
        self.depends.iter().all(|name| registry.contains(name))
    }
}

/// Ordered queue of extensions whose dependencies are unsatisfied.
///
/// Entries leave the queue exactly once: promoted during a drain pass once
/// their dependencies are all registered, or dropped when the promotion
/// attempt fails. Nothing expires entries — a dependency that never arrives,
/// or a dependency cycle, leaves its entries queued indefinitely with no
/// diagnostic beyond their visible presence here.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: Vec<PendingExtension>,
}

impl PendingQueue {
    pub(crate) fn push(&mut self, entry: PendingExtension) {
        self.entries.push(entry);
    }

    /// Take every entry out for one drain pass; entries still not ready are
    /// pushed back by the caller, preserving their relative order.
    pub(crate) fn take_entries(&mut self) -> Vec<PendingExtension> {
        std::mem::take(&mut self.entries)
    }

    /// Iterate over the queued entries in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingExtension> {
        self.entries.iter()
    }

    /// Queued extension names, in queue order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(PendingExtension::name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(name: &str, depends: &[&str]) -> PendingExtension {
        let descriptor = Descriptor {
            name: name.to_string(),
            entry_point: "x::X".to_string(),
            depends: depends.iter().map(|s| s.to_string()).collect(),
            authors: Vec::new(),
            description: None,
        };
        PendingExtension::new(Arc::new(descriptor), PathBuf::from(format!("{name}.ext")))
    }

    #[test]
    fn test_queue_preserves_order() {
        let mut queue = PendingQueue::default();
        queue.push(entry("c", &["x"]));
        queue.push(entry("a", &["x"]));
        queue.push(entry("b", &["x"]));

        assert_eq!(queue.names(), vec!["c", "a", "b"]);
        assert_eq!(queue.len(), 3);
        assert!(queue.contains("a"));
        assert!(!queue.contains("x"));
    }

    #[test]
    fn test_take_entries_empties_queue() {
        let mut queue = PendingQueue::default();
        queue.push(entry("a", &["x"]));

        let taken = queue.take_entries();
        assert_eq!(taken.len(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_missing_against_registry() {
        let registry = Registry::new();
        let pending = entry("chat", &["transport", "storage"]);

        assert_eq!(pending.missing(&registry), vec!["transport", "storage"]);
        assert!(!pending.is_ready(&registry));

        let none: Vec<&str> = Vec::new();
        assert_eq!(entry("solo", &[]).missing(&registry), none);
        assert!(entry("solo", &[]).is_ready(&registry));
    }
}
