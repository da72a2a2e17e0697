//! End-to-end tests for a disk-backed extension host
//!
//! These exercise the complete flow: package layout -> scan -> dependency
//! ordering -> lifecycle hooks -> reload/unload, with packages laid out as
//! real directories.

use std::fs;

use ext_api::{BoxError, ExportTable, Extension, ExtensionContext};
use ext_core::{ExtensionLoader, LifecycleState};
use ext_pack::DirectoryPackages;
use ext_test_utils::host::{TestHost, descriptor};
use ext_test_utils::probe::{HookLog, RecordingSink, probe_exports};
use pretty_assertions::assert_eq;

/// Extension that writes a file into its data directory on enable.
///
/// Exercises the handshake for real: the context handed over in `attach` is
/// what `on_enable` works with, and the data directory must already exist
/// by then.
#[derive(Default)]
struct Greeter {
    context: Option<ExtensionContext>,
}

impl Extension for Greeter {
    fn attach(&mut self, context: ExtensionContext) {
        self.context = Some(context);
    }

    fn on_enable(&mut self) -> Result<(), BoxError> {
        let context = self.context.as_ref().ok_or("enabled before attach")?;
        let greeting = format!("hello from {}", context.name());
        fs::write(context.data_dir().join("greeting.txt"), greeting)?;
        Ok(())
    }
}

#[test]
fn test_full_host_slice() {
    let host = TestHost::new();
    let hooks = HookLog::new();

    // 1. Lay out packages: two good ones with a dependency between them,
    //    one with no descriptor, one with a broken descriptor
    host.add_package("chat", &descriptor("chat", "chat::Chat", &[]));
    host.add_package("tools", &descriptor("tools", "tools::Palette", &["chat"]));
    host.add_package_without_descriptor("hollow");
    host.add_package_json("broken", "{ not json");

    // 2. Register exports for the good packages
    let reader = DirectoryPackages::new()
        .with_exports("chat.ext", probe_exports("chat::Chat", &hooks))
        .with_exports("tools.ext", probe_exports("tools::Palette", &hooks));

    // 3. Scan
    let sink = RecordingSink::new();
    let mut loader = ExtensionLoader::new(host.root(), reader).with_log_sink(sink.clone());
    loader.scan().unwrap();

    // 4. Both good extensions are up, in whatever order the directory
    //    listing came back in; the bad packages were skipped with one log
    //    line each
    assert_eq!(loader.registry().names(), vec!["chat", "tools"]);
    assert!(loader.pending().is_empty());
    assert_eq!(sink.count("invalid extension package: hollow.ext"), 1);
    assert_eq!(sink.count("malformed descriptor in broken.ext"), 1);
    assert_eq!(sink.count("enabling extension"), 2);

    // 5. Data directories exist on disk next to the packages
    host.assert_data_dir_exists("chat");
    host.assert_data_dir_exists("tools");

    // 6. Hooks ran: one attach and one enable per extension
    assert_eq!(hooks.attachments().len(), 2);
    assert_eq!(hooks.enables(), 2);
    assert_eq!(hooks.disables(), 0);

    // 7. Reload one extension: new context, disable + re-enable
    let before = loader.get("chat").unwrap().context().id();
    loader.reload("chat").unwrap();
    assert_ne!(loader.get("chat").unwrap().context().id(), before);
    assert_eq!(hooks.disables(), 1);
    assert_eq!(hooks.enables(), 3);

    // 8. Unload everything
    loader.unload("chat").unwrap();
    loader.unload("tools").unwrap();
    assert!(loader.registry().is_empty());
    assert_eq!(hooks.disables(), 3);
}

#[test]
fn test_extension_uses_its_data_directory() {
    let host = TestHost::new();
    host.add_package("greeter", &descriptor("greeter", "greeter::Greeter", &[]));

    let mut exports = ExportTable::new();
    exports.register("greeter::Greeter", Greeter::default);
    let reader = DirectoryPackages::new().with_exports("greeter.ext", exports);

    let mut loader = ExtensionLoader::new(host.root(), reader);
    loader.scan().unwrap();

    assert!(loader.is_loaded("greeter"));
    let greeting = fs::read_to_string(host.root().join("greeter").join("greeting.txt")).unwrap();
    assert_eq!(greeting, "hello from greeter");
}

#[test]
fn test_package_added_after_scan() {
    // A consumer waits across scans; dropping its provider in later and
    // loading it promotes the consumer
    let host = TestHost::new();
    let hooks = HookLog::new();
    host.add_package("web", &descriptor("web", "web::Web", &["http"]));

    let reader = DirectoryPackages::new()
        .with_exports("web.ext", probe_exports("web::Web", &hooks))
        .with_exports("http.ext", probe_exports("http::Server", &hooks));
    let mut loader = ExtensionLoader::new(host.root(), reader);
    loader.scan().unwrap();

    assert!(!loader.is_loaded("web"));
    assert_eq!(loader.pending().names(), vec!["web"]);

    let http = host.add_package("http", &descriptor("http", "http::Server", &[]));
    loader.load_package(&http).unwrap();

    assert!(loader.is_loaded("http"));
    assert!(loader.is_loaded("web"));
    assert!(loader.pending().is_empty());
}

#[test]
fn test_rescan_recovers_repaired_package() {
    // First scan skips the malformed package; fixing the descriptor and
    // rescanning brings it up
    let host = TestHost::new();
    let hooks = HookLog::new();
    host.add_package_json("chat", r#"{"name": "chat"}"#);

    let reader =
        DirectoryPackages::new().with_exports("chat.ext", probe_exports("chat::Chat", &hooks));
    let sink = RecordingSink::new();
    let mut loader = ExtensionLoader::new(host.root(), reader).with_log_sink(sink.clone());
    loader.scan().unwrap();

    assert!(!loader.is_loaded("chat"));
    assert_eq!(sink.count("malformed descriptor in chat.ext"), 1);

    host.add_package("chat", &descriptor("chat", "chat::Chat", &[]));
    loader.scan().unwrap();

    assert!(loader.is_loaded("chat"));
    assert_eq!(loader.get("chat").unwrap().state(), LifecycleState::Enabled);
}
