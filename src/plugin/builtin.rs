//! Built-in plugin catalog
//!
//! The CLI persists registry contents between invocations, so each built-in
//! plugin has a serializable state form. This module maps between that
//! state and a live instance, keeping a typed reference alongside the
//! type-erased one handed to the registry so state can be captured back
//! after a command runs.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DoublePlugin, Plugin, VaultPlugin};

#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("Unknown plugin '{0}'. Built-in plugins: double, vault")]
    Unknown(String),
}

/// Serializable state of one built-in plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PluginState {
    /// The stateless transform plugin
    Double,
    /// The vault ledger plugin, including its minted records
    Vault(VaultPlugin),
}

/// A live built-in plugin
pub enum BuiltinPlugin {
    Double(Rc<RefCell<DoublePlugin>>),
    Vault(Rc<RefCell<VaultPlugin>>),
}

impl BuiltinPlugin {
    /// Instantiates a fresh plugin by its catalog name
    pub fn fresh(name: &str) -> Result<Self, BuiltinError> {
        match name {
            "double" => Ok(Self::Double(Rc::new(RefCell::new(DoublePlugin)))),
            "vault" => Ok(Self::Vault(Rc::new(RefCell::new(VaultPlugin::new())))),
            other => Err(BuiltinError::Unknown(other.to_string())),
        }
    }

    /// Restores a plugin from its persisted state
    pub fn from_state(state: PluginState) -> Self {
        match state {
            PluginState::Double => Self::Double(Rc::new(RefCell::new(DoublePlugin))),
            PluginState::Vault(ledger) => Self::Vault(Rc::new(RefCell::new(ledger))),
        }
    }

    /// Captures the plugin's current state for persistence
    pub fn to_state(&self) -> PluginState {
        match self {
            Self::Double(_) => PluginState::Double,
            Self::Vault(ledger) => PluginState::Vault(ledger.borrow().clone()),
        }
    }

    /// The type-erased reference the registry stores
    pub fn as_dyn(&self) -> Rc<RefCell<dyn Plugin>> {
        match self {
            Self::Double(p) => Rc::clone(p) as Rc<RefCell<dyn Plugin>>,
            Self::Vault(p) => Rc::clone(p) as Rc<RefCell<dyn Plugin>>,
        }
    }

    /// Typed access to the vault ledger, if this is the vault plugin
    pub fn vault_ledger(&self) -> Option<Rc<RefCell<VaultPlugin>>> {
        match self {
            Self::Vault(ledger) => Some(Rc::clone(ledger)),
            Self::Double(_) => None,
        }
    }
}
