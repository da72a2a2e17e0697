//! Extension descriptor parsing for `extension.json` entries.
//!
//! A descriptor names an extension, the entry point the loader instantiates,
//! and the extensions it depends on. The canonical entry name is
//! [`DESCRIPTOR_ENTRY`](crate::DESCRIPTOR_ENTRY) (`extension.json`).
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "name": "chat",
//!   "entry_point": "chat::ChatExtension",
//!   "depends": ["transport"],
//!   "authors": ["Example Author"],
//!   "description": "In-game chat commands"
//! }
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Immutable metadata decoded from a package's descriptor entry.
///
/// Constructed once when a package is decoded; the loader treats the value
/// as read-only afterwards. `name` is the identity key across the registry
/// and the pending queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Descriptor {
    /// Extension name, unique across all loaded extensions.
    ///
    /// Also used as the directory name of the extension's private data
    /// directory, so it must be a single path component.
    pub name: String,
    /// Identifier of the factory to instantiate, resolved against the
    /// package's export table (and its parent chain).
    pub entry_point: String,
    /// Names of extensions that must be registered before this one loads.
    /// Order is preserved but carries no semantics.
    #[serde(default)]
    pub depends: Vec<String>,
    /// Extension authors.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Descriptor {
    /// Decode a descriptor from the raw bytes of a metadata entry.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let descriptor: Self = serde_json::from_slice(bytes)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Decode a descriptor from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        Self::from_slice(content.as_bytes())
    }

    /// Whether this extension declares any dependencies.
    pub fn has_depends(&self) -> bool {
        !self.depends.is_empty()
    }

    /// Validate the fields the loader relies on.
    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidDescriptor {
                reason: "name must not be empty".to_string(),
            });
        }
        // The name becomes the data directory component under the loader
        // root, so it must not traverse or nest.
        let mut components = Path::new(&self.name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || self.name.contains('\\') {
            return Err(Error::InvalidDescriptor {
                reason: format!("name {:?} is not usable as a directory name", self.name),
            });
        }
        if self.entry_point.is_empty() {
            return Err(Error::InvalidDescriptor {
                reason: "entry_point must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const CHAT_JSON: &str = r#"
{
  "name": "chat",
  "entry_point": "chat::ChatExtension",
  "depends": ["transport", "storage"],
  "authors": ["Example Author"],
  "description": "In-game chat commands"
}
"#;

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = Descriptor::from_json(CHAT_JSON).unwrap();

        assert_eq!(descriptor.name, "chat");
        assert_eq!(descriptor.entry_point, "chat::ChatExtension");
        assert_eq!(descriptor.depends, vec!["transport", "storage"]);
        assert_eq!(descriptor.authors, vec!["Example Author"]);
        assert_eq!(
            descriptor.description.as_deref(),
            Some("In-game chat commands")
        );
        assert!(descriptor.has_depends());
    }

    #[test]
    fn test_parse_minimal_descriptor() {
        let json = r#"{"name": "minimal", "entry_point": "minimal::Main"}"#;
        let descriptor = Descriptor::from_json(json).unwrap();

        assert_eq!(descriptor.name, "minimal");
        assert_eq!(descriptor.entry_point, "minimal::Main");
        assert!(descriptor.depends.is_empty());
        assert!(descriptor.authors.is_empty());
        assert!(descriptor.description.is_none());
        assert!(!descriptor.has_depends());
    }

    #[test]
    fn test_depends_order_preserved() {
        let json = r#"{"name": "x", "entry_point": "x::X", "depends": ["c", "a", "b"]}"#;
        let descriptor = Descriptor::from_json(json).unwrap();
        assert_eq!(descriptor.depends, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_missing_name_rejected() {
        let json = r#"{"entry_point": "x::X"}"#;
        let err = Descriptor::from_json(json).unwrap_err();
        assert!(matches!(err, Error::DescriptorParse(_)));
    }

    #[test]
    fn test_missing_entry_point_rejected() {
        let json = r#"{"name": "x"}"#;
        let err = Descriptor::from_json(json).unwrap_err();
        assert!(matches!(err, Error::DescriptorParse(_)));
    }

    #[test]
    fn test_not_json_rejected() {
        let err = Descriptor::from_slice(b"not json at all").unwrap_err();
        assert!(matches!(err, Error::DescriptorParse(_)));
    }

    #[rstest]
    #[case("")]
    #[case("..")]
    #[case(".")]
    #[case("a/b")]
    #[case("/abs")]
    #[case("a\\b")]
    fn test_unsafe_name_rejected(#[case] name: &str) {
        let json = format!(r#"{{"name": {:?}, "entry_point": "x::X"}}"#, name);
        let err = Descriptor::from_json(&json).unwrap_err();
        assert!(
            matches!(err, Error::InvalidDescriptor { .. }),
            "expected InvalidDescriptor for name {name:?}, got: {err:?}"
        );
    }

    #[test]
    fn test_empty_entry_point_rejected() {
        let json = r#"{"name": "x", "entry_point": ""}"#;
        let err = Descriptor::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_unknown_fields_accepted() {
        let json = r#"{"name": "x", "entry_point": "x::X", "website": "https://example.com"}"#;
        let descriptor = Descriptor::from_json(json).unwrap();
        assert_eq!(descriptor.name, "x");
    }

    #[test]
    fn test_serialize_round_trip() {
        let descriptor = Descriptor::from_json(CHAT_JSON).unwrap();
        let serialized = serde_json::to_string(&descriptor).unwrap();
        let reparsed = Descriptor::from_json(&serialized).unwrap();
        assert_eq!(descriptor, reparsed);
    }
}
