//! Instrumented extensions and a recording log sink.
//!
//! [`Probe`] is an extension whose hooks report into a shared [`HookLog`],
//! so tests can observe attach/enable/disable ordering from outside the
//! loader. [`RecordingSink`] captures host log lines for assertion.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ext_api::{BoxError, ExportTable, Extension, ExtensionContext, LogSink};
use parking_lot::Mutex;

/// Captures everything the loader reports on its sink.
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages logged so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Whether any logged message contains `needle`.
    pub fn saw(&self, needle: &str) -> bool {
        self.messages.lock().iter().any(|m| m.contains(needle))
    }

    /// Number of logged messages containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }
}

impl LogSink for RecordingSink {
    fn log(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Shared record of probe hook activity.
///
/// One log can back any number of probes; attachments carry the extension
/// name so multi-extension tests can tell them apart.
#[derive(Default)]
pub struct HookLog {
    enables: AtomicUsize,
    disables: AtomicUsize,
    attachments: Mutex<Vec<(String, PathBuf)>>,
}

impl HookLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Successful enable hook runs.
    pub fn enables(&self) -> usize {
        self.enables.load(Ordering::SeqCst)
    }

    /// Disable hook runs.
    pub fn disables(&self) -> usize {
        self.disables.load(Ordering::SeqCst)
    }

    /// `(name, data_dir)` for every attach, in order.
    pub fn attachments(&self) -> Vec<(String, PathBuf)> {
        self.attachments.lock().clone()
    }
}

/// Extension that reports its hook activity into a [`HookLog`].
pub struct Probe {
    hooks: Arc<HookLog>,
    fail_enable: bool,
}

impl Probe {
    /// A probe whose hooks all succeed.
    pub fn new(hooks: Arc<HookLog>) -> Self {
        Self {
            hooks,
            fail_enable: false,
        }
    }

    /// A probe whose enable hook always fails.
    pub fn failing(hooks: Arc<HookLog>) -> Self {
        Self {
            hooks,
            fail_enable: true,
        }
    }
}

impl Extension for Probe {
    fn attach(&mut self, context: ExtensionContext) {
        self.hooks
            .attachments
            .lock()
            .push((context.name().to_string(), context.data_dir().to_path_buf()));
    }

    fn on_enable(&mut self) -> Result<(), BoxError> {
        if self.fail_enable {
            return Err("enable hook refused".into());
        }
        self.hooks.enables.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_disable(&mut self) {
        self.hooks.disables.fetch_add(1, Ordering::SeqCst);
    }
}

/// Export table with a succeeding probe under `entry_point`.
pub fn probe_exports(entry_point: &str, hooks: &Arc<HookLog>) -> ExportTable {
    let hooks = hooks.clone();
    let mut table = ExportTable::new();
    table.register(entry_point, move || Probe::new(hooks.clone()));
    table
}

/// Export table with a probe under `entry_point` whose enable hook fails.
pub fn failing_probe_exports(entry_point: &str, hooks: &Arc<HookLog>) -> ExportTable {
    let hooks = hooks.clone();
    let mut table = ExportTable::new();
    table.register(entry_point, move || Probe::failing(hooks.clone()));
    table
}
