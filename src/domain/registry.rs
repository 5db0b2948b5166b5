//! The dispatch registry
//!
//! An explicitly constructed, owner-controlled catalog of plugins, invoked
//! by numeric position. The registry is the trust boundary between the
//! configured administrator and arbitrary third-party handler logic: it
//! gates every mutation on the caller's identity and wraps every dispatch
//! in a reentrancy guard so a plugin cannot call back into the registry
//! while its own execution is in flight.
//!
//! The registry targets nested reentry, not parallel threads (it is
//! deliberately `!Sync`); plugins are shared as `Rc<RefCell<_>>` so the
//! caller can keep a typed reference for read-only queries after handing
//! the plugin over.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;

use super::guard::{DispatchLock, LockEngaged};
use super::id::{CallerId, PluginHandle};
use crate::plugin::{CallContext, Dispatch, Plugin, PluginError};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unauthorized: caller '{caller}' is not the registry administrator")]
    Unauthorized { caller: CallerId },

    #[error("Plugin already registered under handle {handle}")]
    AlreadyRegistered { handle: PluginHandle },

    #[error("Index out of bounds: position {position} with {count} plugins registered")]
    IndexOutOfBounds { position: usize, count: usize },

    #[error("Invalid plugin ID: position {position} with {count} plugins registered")]
    InvalidPluginId { position: usize, count: usize },

    #[error("Reentrant dispatch rejected: a dispatch is already in progress")]
    ReentrancyViolation(#[from] LockEngaged),

    #[error("Plugin failed")]
    Plugin(#[source] PluginError),
}

/// A registered plugin as seen by callers of [`Registry::entries`]
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry {
    /// Current position of the plugin in the catalog
    pub position: usize,

    /// Handle derived from the plugin's name
    pub handle: PluginHandle,

    /// The plugin's declared name
    pub name: String,
}

struct Entry {
    handle: PluginHandle,
    plugin: Rc<RefCell<dyn Plugin>>,
}

/// Owner-controlled plugin dispatch registry
///
/// Valid positions always form the dense range `[0, count)`. Removal
/// compacts by moving the last entry into the vacated slot, so positions
/// are NOT stable across removals - callers caching a position must
/// re-resolve it after any `remove_plugin`.
pub struct Registry {
    admin: RefCell<CallerId>,
    entries: RefCell<Vec<Entry>>,
    lock: DispatchLock,
}

impl Registry {
    /// Creates an empty registry administered by `admin`
    pub fn new(admin: CallerId) -> Self {
        Self {
            admin: RefCell::new(admin),
            entries: RefCell::new(Vec::new()),
            lock: DispatchLock::new(),
        }
    }

    /// Returns the current administrator identity
    pub fn admin(&self) -> CallerId {
        self.admin.borrow().clone()
    }

    /// Transfers administration to `new_admin`
    ///
    /// Administrator-only; the previous administrator loses all mutation
    /// rights as soon as this returns.
    pub fn transfer_admin(
        &self,
        caller: &CallerId,
        new_admin: CallerId,
    ) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;
        *self.admin.borrow_mut() = new_admin;
        Ok(())
    }

    /// Registers a plugin at the next position
    ///
    /// Administrator-only. The handle is derived from the plugin's declared
    /// name; registering a second plugin with the same name fails with
    /// [`RegistryError::AlreadyRegistered`].
    pub fn add_plugin(
        &self,
        caller: &CallerId,
        plugin: Rc<RefCell<dyn Plugin>>,
    ) -> Result<PluginHandle, RegistryError> {
        self.ensure_admin(caller)?;

        let handle = PluginHandle::of(plugin.borrow().name());

        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|e| e.handle == handle) {
            return Err(RegistryError::AlreadyRegistered { handle });
        }

        entries.push(Entry {
            handle: handle.clone(),
            plugin,
        });

        Ok(handle)
    }

    /// Removes the plugin at `position`, returning its handle
    ///
    /// Administrator-only. Compacts by swapping the last entry into the
    /// vacated slot: after removing position `i`, the plugin formerly at
    /// position `count - 1` occupies position `i`.
    pub fn remove_plugin(
        &self,
        caller: &CallerId,
        position: usize,
    ) -> Result<PluginHandle, RegistryError> {
        self.ensure_admin(caller)?;

        let mut entries = self.entries.borrow_mut();
        let count = entries.len();
        if position >= count {
            return Err(RegistryError::IndexOutOfBounds { position, count });
        }

        Ok(entries.swap_remove(position).handle)
    }

    /// Returns the number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Lists the registered plugins in positional order
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.entries
            .borrow()
            .iter()
            .enumerate()
            .map(|(position, e)| RegistryEntry {
                position,
                handle: e.handle.clone(),
                name: e.plugin.borrow().name().to_string(),
            })
            .collect()
    }

    /// Returns true while a dispatch is in flight
    ///
    /// Exposed so callers can assert the guard invariant: outside the
    /// dynamic extent of one `execute_plugin` call this is always false,
    /// including immediately after a failed dispatch.
    pub fn is_dispatching(&self) -> bool {
        self.lock.is_engaged()
    }

    /// Dispatches to the plugin at `position` with `input`
    ///
    /// Callable by anyone. The position is validated before the lock is
    /// engaged, so out-of-range failures never touch the guard. The plugin
    /// runs with `caller` as its effective caller context; on success its
    /// output and emitted notifications are returned together. On any
    /// failure - invalid position, reentrancy, or the plugin itself - the
    /// whole dispatch fails, notifications are discarded, and the lock is
    /// released.
    pub fn execute_plugin(
        &self,
        caller: &CallerId,
        position: usize,
        input: u64,
    ) -> Result<Dispatch, RegistryError> {
        let count = self.entries.borrow().len();
        if position >= count {
            return Err(RegistryError::InvalidPluginId { position, count });
        }

        let _guard = self.lock.engage()?;

        // Clone out the Rc so the entries borrow is not held across the
        // plugin call; the guard, not the borrow, is what blocks reentry.
        let plugin = Rc::clone(&self.entries.borrow()[position].plugin);

        let mut ctx = CallContext::new(self, caller.clone());
        let value = plugin
            .borrow_mut()
            .perform_action(&mut ctx, input)
            .map_err(RegistryError::Plugin)?;

        Ok(Dispatch {
            value,
            notifications: ctx.into_notifications(),
        })
    }

    fn ensure_admin(&self, caller: &CallerId) -> Result<(), RegistryError> {
        if *caller != *self.admin.borrow() {
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }
}
