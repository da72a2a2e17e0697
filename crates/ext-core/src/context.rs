//! Isolated loading contexts and the entry-point resolver chain.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ext_api::{ConstructorFn, ExportTable, Extension, ExtensionContext};
use ext_meta::Descriptor;
use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Shared cell holding one live extension instance.
///
/// The loader keeps one clone in the extension's handle and the creating
/// context keeps another, which is how the context can later verify that an
/// instance offered for initialization is really its own.
pub type SharedExtension = Arc<Mutex<Box<dyn Extension>>>;

/// Resolves entry-point identifiers to constructors.
///
/// Implemented by [`LoadContext`] (own export table first, then parent) and
/// by [`ExportTable`] itself (table only), so a host's export table can sit
/// at the root of a resolver chain.
pub trait EntryPointResolver: Send + Sync {
    fn resolve_entry_point(&self, entry_point: &str) -> Option<ConstructorFn>;
}

impl EntryPointResolver for ExportTable {
    fn resolve_entry_point(&self, entry_point: &str) -> Option<ConstructorFn> {
        self.get(entry_point)
    }
}

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Isolated loading context for one package.
///
/// Owns the package's export table and at most one live instance created
/// from it; re-instantiating through the same context overwrites the held
/// instance. Lookups missing the own table are delegated to the parent
/// resolver, unbounded in depth. The loader creates contexts and owns the
/// chaining relationship; the parent pointer is only ever used for
/// delegated lookups.
///
/// Each context carries a process-unique id so callers can observe that a
/// reload produced a genuinely new context.
pub struct LoadContext {
    id: u64,
    descriptor: Arc<Descriptor>,
    package: PathBuf,
    data_dir: PathBuf,
    exports: ExportTable,
    parent: Arc<dyn EntryPointResolver>,
    instance: Mutex<Option<SharedExtension>>,
}

impl LoadContext {
    pub fn new(
        descriptor: Arc<Descriptor>,
        package: PathBuf,
        data_dir: PathBuf,
        exports: ExportTable,
        parent: Arc<dyn EntryPointResolver>,
    ) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            descriptor,
            package,
            data_dir,
            exports,
            parent,
            instance: Mutex::new(None),
        }
    }

    /// Process-unique identity of this context.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn descriptor(&self) -> &Arc<Descriptor> {
        &self.descriptor
    }

    /// Location of the package this context loads from.
    pub fn package(&self) -> &Path {
        &self.package
    }

    /// Private data directory derived for this extension.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The parent resolver this context delegates missed lookups to.
    pub fn parent(&self) -> Arc<dyn EntryPointResolver> {
        self.parent.clone()
    }

    /// Resolve the descriptor's entry point and construct one instance.
    ///
    /// The constructed instance becomes this context's held instance,
    /// replacing any previous one. The per-context lock is held across the
    /// whole construction, so concurrent callers cannot race two
    /// constructions of the same entry point.
    pub fn instantiate(&self) -> Result<SharedExtension> {
        let mut slot = self.instance.lock();

        let name = &self.descriptor.name;
        let entry_point = &self.descriptor.entry_point;

        let constructor =
            self.resolve_entry_point(entry_point)
                .ok_or_else(|| Error::EntryPointNotFound {
                    name: name.clone(),
                    entry_point: entry_point.clone(),
                })?;

        let product = constructor().map_err(|source| Error::ConstructionFailed {
            name: name.clone(),
            source,
        })?;

        let extension = product
            .downcast::<Box<dyn Extension>>()
            .map_err(|_| Error::NotAnExtension {
                name: name.clone(),
                entry_point: entry_point.clone(),
            })?;

        tracing::debug!("constructed extension {name} from entry point {entry_point:?}");

        let cell: SharedExtension = Arc::new(Mutex::new(*extension));
        *slot = Some(cell.clone());
        Ok(cell)
    }

    /// Attach the execution parameters to an instance this context created.
    ///
    /// Refuses instances held by other contexts with
    /// [`Error::WrongContext`]. Idempotent: attaching again replaces the
    /// previous parameters.
    pub fn initialize(&self, instance: &SharedExtension) -> Result<()> {
        let slot = self.instance.lock();

        let owned = slot.as_ref().is_some_and(|held| Arc::ptr_eq(held, instance));
        if !owned {
            tracing::warn!(
                "refusing to initialize extension {:?}: instance was not created by this context",
                self.descriptor.name
            );
            return Err(Error::WrongContext {
                name: self.descriptor.name.clone(),
            });
        }

        let context = ExtensionContext::new(
            self.descriptor.clone(),
            self.data_dir.clone(),
            self.package.clone(),
        );
        instance.lock().attach(context);
        Ok(())
    }
}

impl EntryPointResolver for LoadContext {
    fn resolve_entry_point(&self, entry_point: &str) -> Option<ConstructorFn> {
        self.exports
            .get(entry_point)
            .or_else(|| self.parent.resolve_entry_point(entry_point))
    }
}

impl fmt::Debug for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadContext")
            .field("id", &self.id)
            .field("name", &self.descriptor.name)
            .field("package", &self.package)
            .finish_non_exhaustive()
    }
}
