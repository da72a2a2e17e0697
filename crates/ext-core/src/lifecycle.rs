//! Lifecycle states and the loader-side extension handle.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ext_meta::Descriptor;

use crate::context::{LoadContext, SharedExtension};
use crate::error::{Error, Result};

/// Progression of one extension instance.
///
/// `Constructed → Initialized → Enabled → Disabled`, strictly forward; a
/// disabled extension only becomes enabled again through a fresh
/// construction (reload).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Built by its context, execution parameters not yet attached.
    Constructed,
    /// Execution parameters attached; ready for the enable hook.
    Initialized,
    /// Enable hook ran successfully; the extension is live.
    Enabled,
    /// Disable hook ran; the instance is logically dead.
    Disabled,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LifecycleState::Constructed => "constructed",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Enabled => "enabled",
            LifecycleState::Disabled => "disabled",
        };
        f.write_str(label)
    }
}

/// Loader-side record of one extension instance.
///
/// Carries the shared instance cell, the context that created it, and the
/// lifecycle bookkeeping. The loader drives the transitions; embedders get
/// read access plus the instance cell for calling into the extension.
pub struct ExtensionHandle {
    descriptor: Arc<Descriptor>,
    cell: SharedExtension,
    context: Arc<LoadContext>,
    state: LifecycleState,
    enabled_at: Option<DateTime<Utc>>,
}

impl ExtensionHandle {
    pub(crate) fn new(cell: SharedExtension, context: Arc<LoadContext>) -> Self {
        Self {
            descriptor: context.descriptor().clone(),
            cell,
            context,
            state: LifecycleState::Constructed,
            enabled_at: None,
        }
    }

    /// Attach execution parameters through the owning context.
    pub(crate) fn initialize(&mut self) -> Result<()> {
        self.context.initialize(&self.cell)?;
        if self.state == LifecycleState::Constructed {
            self.state = LifecycleState::Initialized;
        }
        Ok(())
    }

    /// Run the enable hook, once.
    pub(crate) fn enable(&mut self) -> Result<()> {
        if self.state != LifecycleState::Initialized {
            return Err(Error::InvalidTransition {
                name: self.name().to_string(),
                state: self.state,
            });
        }
        self.cell
            .lock()
            .on_enable()
            .map_err(|source| Error::EnableFailed {
                name: self.name().to_string(),
                source,
            })?;
        self.state = LifecycleState::Enabled;
        self.enabled_at = Some(Utc::now());
        Ok(())
    }

    /// Run the disable hook if the extension is enabled; otherwise a no-op,
    /// so the hook can never run twice for one load.
    pub(crate) fn disable(&mut self) {
        if self.state == LifecycleState::Enabled {
            self.cell.lock().on_disable();
            self.state = LifecycleState::Disabled;
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// The context that created this instance.
    pub fn context(&self) -> &Arc<LoadContext> {
        &self.context
    }

    /// The shared instance cell, for calling into the extension.
    pub fn instance(&self) -> &SharedExtension {
        &self.cell
    }

    pub fn data_dir(&self) -> &Path {
        self.context.data_dir()
    }

    pub fn package(&self) -> &Path {
        self.context.package()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// When the enable hook last succeeded, if it has.
    pub fn enabled_at(&self) -> Option<DateTime<Utc>> {
        self.enabled_at
    }
}

impl fmt::Debug for ExtensionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionHandle")
            .field("name", &self.name())
            .field("state", &self.state)
            .field("context", &self.context.id())
            .finish_non_exhaustive()
    }
}
