//! The loader: scanning, dependency ordering, and lifecycle orchestration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ext_api::{ExportTable, LogSink, TracingSink};
use ext_meta::{DESCRIPTOR_ENTRY, Descriptor};
use ext_pack::{PACKAGE_SUFFIX, PackageReader};

use crate::context::{EntryPointResolver, LoadContext};
use crate::error::{Error, Result};
use crate::lifecycle::ExtensionHandle;
use crate::pending::{PendingExtension, PendingQueue};
use crate::registry::Registry;

/// Discovers, orders, and drives extensions from a root directory.
///
/// The loader owns the registry and the pending queue; two loaders share
/// nothing. Per-extension failures are reported on the host log sink and
/// never stop a scan.
///
/// ```no_run
/// use ext_api::ExportTable;
/// use ext_core::ExtensionLoader;
/// use ext_pack::DirectoryPackages;
///
/// # fn run() -> ext_core::Result<()> {
/// let reader = DirectoryPackages::new().with_exports("chat.ext", ExportTable::new());
/// let mut loader = ExtensionLoader::new("extensions", reader);
/// loader.scan()?;
/// if loader.is_loaded("chat") {
///     println!("chat is up");
/// }
/// # Ok(())
/// # }
/// ```
pub struct ExtensionLoader {
    root: PathBuf,
    package_suffix: String,
    reader: Box<dyn PackageReader>,
    sink: Arc<dyn LogSink>,
    host_exports: Arc<dyn EntryPointResolver>,
    registry: Registry,
    pending: PendingQueue,
}

impl ExtensionLoader {
    /// Create a loader over `root`, reading packages through `reader`.
    ///
    /// Loader messages go to `tracing` unless a sink is installed with
    /// [`with_log_sink`](Self::with_log_sink); entry points resolve against
    /// package exports only unless the host roots the chain with
    /// [`with_host_exports`](Self::with_host_exports).
    pub fn new(root: impl Into<PathBuf>, reader: impl PackageReader + 'static) -> Self {
        Self {
            root: root.into(),
            package_suffix: PACKAGE_SUFFIX.to_string(),
            reader: Box::new(reader),
            sink: Arc::new(TracingSink),
            host_exports: Arc::new(ExportTable::new()),
            registry: Registry::new(),
            pending: PendingQueue::default(),
        }
    }

    /// Root the resolver chain in the host's own export table.
    pub fn with_host_exports(mut self, exports: ExportTable) -> Self {
        self.host_exports = Arc::new(exports);
        self
    }

    /// Route loader messages to `sink` instead of `tracing`.
    pub fn with_log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Override the package suffix scanned for (default `.ext`).
    pub fn with_package_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.package_suffix = suffix.into();
        self
    }

    /// The directory packages are scanned from and data directories live
    /// under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read-only view of the currently loaded extensions.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read-only view of the extensions still waiting on dependencies.
    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    /// Whether an extension with this name is currently loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Handle of the loaded extension with this name, if any.
    pub fn get(&self, name: &str) -> Option<&ExtensionHandle> {
        self.registry.get(name)
    }

    /// Load every package in the root directory.
    ///
    /// Creates the root if it does not exist. Children whose name carries
    /// the package suffix are loaded in whatever order the directory
    /// listing yields; nothing about that order is stable. A package whose
    /// load fails is reported on the sink and the scan continues.
    pub fn scan(&mut self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| Error::io(&self.root, e))?;
        }

        let entries = fs::read_dir(&self.root).map_err(|e| Error::io(&self.root, e))?;
        for entry in entries.flatten() {
            let path = entry.path();
            let is_package = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(&self.package_suffix));
            if !is_package {
                continue;
            }

            if let Err(e) = self.load_package(&path) {
                self.sink
                    .log(&format!("failed to load package {}: {e}", file_label(&path)));
            }
        }

        Ok(())
    }

    /// Load one package.
    ///
    /// A package without the metadata entry, or with a malformed
    /// descriptor, is skipped with a single sink message and `Ok(())` —
    /// non-fatal by design so a scan keeps going. I/O failures reading the
    /// package propagate and abort only this package's load.
    ///
    /// Extensions with no dependencies register immediately; the rest join
    /// the pending queue. Either way one drain pass runs afterwards, rooted
    /// in this package's context, so anything the new registration
    /// unblocked gets promoted.
    pub fn load_package(&mut self, location: &Path) -> Result<()> {
        if !self.reader.contains(location, DESCRIPTOR_ENTRY) {
            self.sink
                .log(&format!("invalid extension package: {}", file_label(location)));
            return Ok(());
        }

        let bytes = self.reader.read(location, DESCRIPTOR_ENTRY)?;
        let descriptor = match Descriptor::from_slice(&bytes) {
            Ok(descriptor) => Arc::new(descriptor),
            Err(e) => {
                self.sink.log(&format!(
                    "malformed descriptor in {}: {e}",
                    file_label(location)
                ));
                return Ok(());
            }
        };

        let context = self.create_context(descriptor.clone(), location, self.host_exports.clone())?;

        if descriptor.has_depends() {
            tracing::debug!(
                "queueing extension {} behind {:?}",
                descriptor.name,
                descriptor.depends
            );
            self.pending
                .push(PendingExtension::new(descriptor, location.to_path_buf()));
        } else if let Err(e) = self.register(&context) {
            self.sink.log(&format!(
                "error while loading extension {}: {e}",
                descriptor.name
            ));
        }

        self.drain_pending(context);
        Ok(())
    }

    /// One pass over the pending queue.
    ///
    /// Entries whose dependencies are all registered are promoted in queue
    /// order; an entry leaves the queue on its promotion attempt whether or
    /// not registration succeeds. Not a fixed point: entries further down
    /// the queue unblocked by a promotion earlier in the same pass are
    /// picked up, but nothing loops back to the top — repeated
    /// `load_package` calls provide that effect across a scan. There is no
    /// cycle detection; mutually dependent extensions sit in the queue
    /// forever.
    ///
    /// Each promoted extension's context parents to the previous context
    /// created in this pass (initially `parent`), so later promotions can
    /// resolve entry points belonging to earlier ones without declaring
    /// them as dependencies.
    fn drain_pending(&mut self, parent: Arc<LoadContext>) {
        let mut chain_head: Arc<dyn EntryPointResolver> = parent;

        for entry in self.pending.take_entries() {
            if !entry.is_ready(&self.registry) {
                self.pending.push(entry);
                continue;
            }

            match self.create_context(entry.descriptor_arc(), entry.location(), chain_head.clone())
            {
                Ok(context) => {
                    if let Err(e) = self.register(&context) {
                        self.sink.log(&format!(
                            "error while loading extension {}: {e}",
                            entry.name()
                        ));
                    }
                    chain_head = context;
                }
                Err(e) => {
                    self.sink.log(&format!(
                        "error while loading extension {}: {e}",
                        entry.name()
                    ));
                }
            }
        }
    }

    /// Instantiate, initialize, enable, and insert into the registry.
    ///
    /// Nothing is inserted unless every step succeeded; a failure leaves
    /// the registry without the extension and the error with the caller.
    fn register(&mut self, context: &Arc<LoadContext>) -> Result<()> {
        let name = context.descriptor().name.clone();

        let cell = context.instantiate()?;
        let mut handle = ExtensionHandle::new(cell, context.clone());
        handle.initialize()?;

        fs::create_dir_all(handle.data_dir())
            .map_err(|e| Error::io(handle.data_dir(), e))?;

        self.sink.log(&format!("enabling extension {name}"));
        handle.enable()?;

        // A displaced duplicate is dropped without its disable hook running.
        let displaced = self.registry.insert(handle);
        if displaced.is_some() {
            tracing::debug!("extension {name} replaced a previously loaded instance");
        }
        Ok(())
    }

    /// Disable and unregister `name`, then rebuild it from its package.
    ///
    /// The new context keeps the old context's parent but is a distinct
    /// context; the data directory path is unchanged. Fails with the
    /// extension left unloaded if its package can no longer be read or its
    /// descriptor no longer decodes.
    pub fn reload(&mut self, name: &str) -> Result<()> {
        let handle = self.registry.get(name).ok_or_else(|| Error::NotLoaded {
            name: name.to_string(),
        })?;
        let parent = handle.context().parent();
        let location = handle.package().to_path_buf();

        self.unload(name)?;

        let bytes = self.reader.read(&location, DESCRIPTOR_ENTRY)?;
        let descriptor = Arc::new(Descriptor::from_slice(&bytes)?);
        let context = self.create_context(descriptor, &location, parent)?;
        self.register(&context)
    }

    /// Disable `name` and remove it from the registry.
    ///
    /// Pending entries are untouched and the context's resources are not
    /// released; anything chained through the context keeps resolving.
    pub fn unload(&mut self, name: &str) -> Result<()> {
        let mut handle = self.registry.remove(name).ok_or_else(|| Error::NotLoaded {
            name: name.to_string(),
        })?;
        handle.disable();
        Ok(())
    }

    fn create_context(
        &self,
        descriptor: Arc<Descriptor>,
        location: &Path,
        parent: Arc<dyn EntryPointResolver>,
    ) -> Result<Arc<LoadContext>> {
        let exports = self.reader.exports(location)?;
        let data_dir = self.root.join(&descriptor.name);
        Ok(Arc::new(LoadContext::new(
            descriptor,
            location.to_path_buf(),
            data_dir,
            exports,
            parent,
        )))
    }
}

fn file_label(location: &Path) -> String {
    location
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| location.display().to_string())
}
