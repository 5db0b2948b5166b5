//! CLI session: a registry rebuilt from a workspace snapshot
//!
//! Each CLI invocation loads the snapshot, replays it into a fresh
//! in-memory [`Registry`], runs one command, and writes the snapshot back.
//! The session keeps the typed built-in handles alongside the registry so
//! plugin state can be captured for persistence; its own plugin list
//! mirrors the registry's positions exactly, including swap-remove
//! compaction.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::domain::{CallerId, PluginHandle, Registry};
use crate::plugin::builtin::BuiltinPlugin;
use crate::plugin::{Dispatch, VaultPlugin};
use crate::storage::{Snapshot, Workspace};

/// One CLI invocation's view of the persisted registry
pub struct Session {
    workspace: Workspace,
    registry: Registry,
    builtins: Vec<BuiltinPlugin>,
}

impl Session {
    /// Loads the session for the workspace containing the current directory
    pub fn open_current() -> Result<Self> {
        Self::open(Workspace::open_current()?)
    }

    /// Loads the session for a specific workspace
    pub fn open(workspace: Workspace) -> Result<Self> {
        let snapshot = workspace.state_store().load()?;

        let registry = Registry::new(snapshot.admin.clone());
        let mut builtins = Vec::with_capacity(snapshot.plugins.len());

        for state in snapshot.plugins {
            let plugin = BuiltinPlugin::from_state(state);
            registry.add_plugin(&snapshot.admin, plugin.as_dyn())?;
            builtins.push(plugin);
        }

        Ok(Self {
            workspace,
            registry,
            builtins,
        })
    }

    /// The workspace this session was loaded from
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// The live registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers a built-in plugin by catalog name
    pub fn add(&mut self, caller: &CallerId, name: &str) -> Result<PluginHandle> {
        let plugin = BuiltinPlugin::fresh(name)?;
        let handle = self.registry.add_plugin(caller, plugin.as_dyn())?;
        self.builtins.push(plugin);
        Ok(handle)
    }

    /// Removes the plugin at `position`
    pub fn remove(&mut self, caller: &CallerId, position: usize) -> Result<PluginHandle> {
        let handle = self.registry.remove_plugin(caller, position)?;
        // Mirror the registry's swap-remove so positions stay parallel
        self.builtins.swap_remove(position);
        Ok(handle)
    }

    /// Dispatches to the plugin at `position`
    pub fn execute(&self, caller: &CallerId, position: usize, input: u64) -> Result<Dispatch> {
        Ok(self.registry.execute_plugin(caller, position, input)?)
    }

    /// Typed access to the vault ledger, if one is registered
    pub fn vault_ledger(&self) -> Option<Rc<RefCell<VaultPlugin>>> {
        self.builtins.iter().find_map(BuiltinPlugin::vault_ledger)
    }

    /// Persists the current registry contents back to the workspace
    pub fn save(&self) -> Result<()> {
        let snapshot = Snapshot {
            admin: self.registry.admin(),
            plugins: self.builtins.iter().map(BuiltinPlugin::to_state).collect(),
        };

        self.workspace.state_store().save(&snapshot)
    }
}
