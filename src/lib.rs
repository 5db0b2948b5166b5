//! Switchboard - an owner-controlled dispatch registry for pluggable handlers
//!
//! Switchboard keeps an ordered catalog of "plugins" (action handlers) that
//! can be registered and removed by a configured administrator and invoked
//! by numeric position by anyone. Dispatch is protected by a reentrancy
//! guard: a plugin that tries to call back into the registry during its own
//! execution is rejected before it can observe or corrupt in-flight state.

pub mod domain;
pub mod plugin;
pub mod storage;
pub mod cli;

pub use domain::{CallerId, PluginHandle, Registry, RegistryEntry, RegistryError};
pub use plugin::{CallContext, Dispatch, Notification, Plugin, PluginError};
