//! Domain models for Switchboard
//!
//! Contains the registry core and its identity types, without any I/O
//! concerns. The dispatch registry and its reentrancy guard live here.

mod id;
mod guard;
mod registry;

pub use id::{CallerId, HandleError, PluginHandle};
pub use guard::{DispatchLock, LockEngaged, LockGuard};
pub use registry::{Registry, RegistryEntry, RegistryError};
