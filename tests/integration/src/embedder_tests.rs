//! End-to-end tests for an embedding host using in-memory packages
//!
//! An embedder ships its extensions compiled in: package locations are
//! virtual keys, export tables come from the binary, and only the data
//! directories ever touch disk.

use std::path::Path;

use ext_core::ExtensionLoader;
use ext_pack::{MemoryPackage, MemoryPackages};
use ext_test_utils::host::descriptor;
use ext_test_utils::probe::{HookLog, RecordingSink, failing_probe_exports, probe_exports};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn builtin(name: &str, depends: &[&str], hooks: &std::sync::Arc<HookLog>) -> MemoryPackage {
    let entry = format!("{name}::Main");
    MemoryPackage::new()
        .with_descriptor(&descriptor(name, &entry, depends))
        .unwrap()
        .with_exports(probe_exports(&entry, hooks))
}

#[test]
fn test_embedded_packages_load_from_virtual_locations() {
    let temp = TempDir::new().unwrap();
    let hooks = HookLog::new();
    let reader = MemoryPackages::new()
        .with_package("builtin/chat.ext", builtin("chat", &[], &hooks))
        .with_package("builtin/tools.ext", builtin("tools", &["chat"], &hooks));

    let mut loader = ExtensionLoader::new(temp.path(), reader);
    loader.load_package(Path::new("builtin/tools.ext")).unwrap();
    loader.load_package(Path::new("builtin/chat.ext")).unwrap();

    assert_eq!(loader.registry().names(), vec!["chat", "tools"]);
    assert_eq!(hooks.enables(), 2);

    // Data directories are real even though the packages are not
    assert!(temp.path().join("chat").is_dir());
    assert!(temp.path().join("tools").is_dir());
    assert!(!temp.path().join("builtin").exists());
}

#[test]
fn test_deep_chain_needs_a_second_pass() {
    // One drain pass promotes in queue order without looping back: with
    // the queue holding [c, b] and only a registered, c is checked before
    // b registers, so c stays pending until something loads again
    let temp = TempDir::new().unwrap();
    let hooks = HookLog::new();
    let reader = MemoryPackages::new()
        .with_package("a.ext", builtin("a", &[], &hooks))
        .with_package("b.ext", builtin("b", &["a"], &hooks))
        .with_package("c.ext", builtin("c", &["b"], &hooks));

    let mut loader = ExtensionLoader::new(temp.path(), reader);
    loader.load_package(Path::new("c.ext")).unwrap();
    loader.load_package(Path::new("b.ext")).unwrap();
    loader.load_package(Path::new("a.ext")).unwrap();

    assert!(loader.is_loaded("a"));
    assert!(loader.is_loaded("b"));
    assert!(!loader.is_loaded("c"));
    assert_eq!(loader.pending().names(), vec!["c"]);

    // Any later load drains again; re-loading the root displaces the old
    // "a" without disabling it and finally promotes c
    loader.load_package(Path::new("a.ext")).unwrap();

    assert!(loader.is_loaded("c"));
    assert!(loader.pending().is_empty());
    assert_eq!(hooks.disables(), 0);
}

#[test]
fn test_enable_failure_reported_on_sink() {
    let temp = TempDir::new().unwrap();
    let hooks = HookLog::new();
    let package = MemoryPackage::new()
        .with_descriptor(&descriptor("flaky", "flaky::Main", &[]))
        .unwrap()
        .with_exports(failing_probe_exports("flaky::Main", &hooks));
    let reader = MemoryPackages::new().with_package("flaky.ext", package);

    let sink = RecordingSink::new();
    let mut loader = ExtensionLoader::new(temp.path(), reader).with_log_sink(sink.clone());
    loader.load_package(Path::new("flaky.ext")).unwrap();

    assert!(!loader.is_loaded("flaky"));
    assert_eq!(sink.count("error while loading extension flaky"), 1);
    assert!(sink.saw("enable hook refused"));
}

#[test]
fn test_two_hosts_share_nothing() {
    let temp_a = TempDir::new().unwrap();
    let temp_b = TempDir::new().unwrap();
    let hooks = HookLog::new();

    let mut first = ExtensionLoader::new(
        temp_a.path(),
        MemoryPackages::new().with_package("chat.ext", builtin("chat", &[], &hooks)),
    );
    let second = ExtensionLoader::new(temp_b.path(), MemoryPackages::new());

    first.load_package(Path::new("chat.ext")).unwrap();

    assert!(first.is_loaded("chat"));
    assert!(!second.is_loaded("chat"));
    assert!(!temp_b.path().join("chat").exists());
}
