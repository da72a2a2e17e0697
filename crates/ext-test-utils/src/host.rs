//! [`TestHost`] builder for on-disk extension package layouts.

use std::fs;
use std::path::{Path, PathBuf};

use ext_meta::{DESCRIPTOR_ENTRY, Descriptor};
use ext_pack::PACKAGE_SUFFIX;
use tempfile::TempDir;

/// A temporary extension root with helper methods for laying out packages
/// and asserting on loader side effects.
///
/// # Example
///
/// ```rust,no_run
/// use ext_test_utils::host::{TestHost, descriptor};
///
/// let host = TestHost::new();
/// host.add_package("chat", &descriptor("chat", "chat::Chat", &[]));
/// host.assert_data_dir_not_exists("chat");
/// ```
pub struct TestHost {
    temp_dir: TempDir,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    /// Create an empty temporary extension root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the extension root path.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The on-disk directory name a package called `name` gets.
    pub fn package_name(name: &str) -> String {
        format!("{name}{PACKAGE_SUFFIX}")
    }

    /// Write a package directory `<name>.ext` with `descriptor` serialized
    /// under the metadata entry. Returns the package location.
    pub fn add_package(&self, name: &str, descriptor: &Descriptor) -> PathBuf {
        let json = serde_json::to_string_pretty(descriptor)
            .expect("TestHost::add_package: descriptor must serialize");
        self.add_package_json(name, &json)
    }

    /// Write a package directory `<name>.ext` with raw `json` as its
    /// metadata entry. Use for malformed-descriptor scenarios.
    ///
    /// # Panics
    /// Panics if the package directory cannot be created.
    pub fn add_package_json(&self, name: &str, json: &str) -> PathBuf {
        let dir = self.root().join(Self::package_name(name));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DESCRIPTOR_ENTRY), json).unwrap();
        dir
    }

    /// Write a package directory `<name>.ext` with no metadata entry at all.
    pub fn add_package_without_descriptor(&self, name: &str) -> PathBuf {
        let dir = self.root().join(Self::package_name(name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write an extra entry into an existing package directory.
    pub fn add_entry(&self, name: &str, entry: &str, bytes: &[u8]) {
        let dir = self.root().join(Self::package_name(name));
        fs::write(dir.join(entry), bytes).unwrap();
    }

    /// Remove a package's metadata entry, leaving the directory behind.
    pub fn remove_descriptor(&self, name: &str) {
        let path = self
            .root()
            .join(Self::package_name(name))
            .join(DESCRIPTOR_ENTRY);
        fs::remove_file(path).unwrap();
    }

    /// Assert that the data directory for `name` exists under the root.
    ///
    /// # Panics
    /// Panics with a descriptive message if the directory does not exist.
    pub fn assert_data_dir_exists(&self, name: &str) {
        let dir = self.root().join(name);
        assert!(
            dir.is_dir(),
            "Expected data directory to exist: {}",
            dir.display()
        );
    }

    /// Assert that the data directory for `name` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the directory exists.
    pub fn assert_data_dir_not_exists(&self, name: &str) {
        let dir = self.root().join(name);
        assert!(
            !dir.exists(),
            "Expected data directory NOT to exist: {}",
            dir.display()
        );
    }
}

/// Build a descriptor without going through JSON.
pub fn descriptor(name: &str, entry_point: &str, depends: &[&str]) -> Descriptor {
    Descriptor {
        name: name.to_string(),
        entry_point: entry_point.to_string(),
        depends: depends.iter().map(|s| s.to_string()).collect(),
        authors: Vec::new(),
        description: None,
    }
}
