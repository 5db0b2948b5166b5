//! # Plugin System
//!
//! The capability interface the registry requires from every handler, plus
//! the built-in plugins that ship with Switchboard.
//!
//! ## Overview
//!
//! A plugin is any type implementing [`Plugin`]: a single entrypoint that
//! takes one numeric input and returns one numeric output. A plugin owns its
//! private state exclusively; the registry never inspects it and reaches the
//! plugin only through `perform_action`.
//!
//! During execution a plugin holds a [`CallContext`], through which it can:
//! - read the identity of the caller that triggered the dispatch,
//! - emit [`Notification`]s, delivered to the caller atomically with the
//!   dispatch result,
//! - attempt a nested dispatch back into the registry. The registry's
//!   reentrancy guard rejects this while the outer dispatch is in flight;
//!   a plugin must not assume a nested dispatch can complete.
//!
//! ## Built-in plugins
//!
//! | Name | Behavior |
//! |------|----------|
//! | `double` | returns `2 * input`, stateless |
//! | `vault` | mints one sequentially-numbered vault record per call |

mod double;
mod vault;

pub mod builtin;

pub use double::DoublePlugin;
pub use vault::{Vault, VaultPlugin};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CallerId, Registry, RegistryError};

/// Failure raised by a plugin's own entrypoint
///
/// Propagated to the dispatch caller as the failure of the whole operation;
/// the registry releases its lock and discards collected notifications.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin cannot act on the given input
    #[error("Rejected input: {0}")]
    RejectedInput(String),

    /// A nested dispatch attempted by the plugin failed
    #[error("Nested dispatch failed")]
    Dispatch(#[source] Box<RegistryError>),
}

impl From<RegistryError> for PluginError {
    fn from(err: RegistryError) -> Self {
        PluginError::Dispatch(Box::new(err))
    }
}

/// A structured event emitted by a plugin during dispatch
///
/// Notifications are buffered by the [`CallContext`] and handed to the
/// caller together with the dispatch result. A failed dispatch discards
/// them wholesale, so observers never see effects of an aborted call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Event topic, e.g. `vault.created`
    pub topic: String,

    /// Structured event payload
    pub payload: serde_json::Value,
}

impl Notification {
    /// Creates a notification with the given topic and payload
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// The successful outcome of a dispatch
///
/// The returned `value` is the plugin's output directly. For the vault
/// plugin this is the freshly minted vault id, and the same id appears in
/// the `vault.created` notification payload; the two always agree.
#[derive(Debug, Clone, Serialize)]
pub struct Dispatch {
    /// The plugin's output value
    pub value: u64,

    /// Notifications emitted during the dispatch, in emission order
    pub notifications: Vec<Notification>,
}

/// Execution context handed to a plugin for the duration of one dispatch
pub struct CallContext<'a> {
    registry: &'a Registry,
    caller: CallerId,
    notifications: Vec<Notification>,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(registry: &'a Registry, caller: CallerId) -> Self {
        Self {
            registry,
            caller,
            notifications: Vec::new(),
        }
    }

    /// Identity of the caller that triggered this dispatch
    pub fn caller(&self) -> &CallerId {
        &self.caller
    }

    /// Emits a notification, delivered with the dispatch result on success
    pub fn emit(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Attempts a nested dispatch through the owning registry
    ///
    /// This exists so the registry's reentrancy guard has something to
    /// defend against: while the outer dispatch is in flight the nested
    /// call fails with a reentrancy violation.
    pub fn dispatch(&mut self, position: usize, input: u64) -> Result<Dispatch, RegistryError> {
        self.registry.execute_plugin(&self.caller, position, input)
    }

    pub(crate) fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}

/// The capability interface every registered plugin implements
///
/// Contract: a failing `perform_action` must leave the plugin's own state
/// unchanged, so that a failed dispatch is all-or-nothing from the caller's
/// point of view.
pub trait Plugin {
    /// Stable name of the plugin; the registry derives its handle from this
    fn name(&self) -> &str;

    /// The single action entrypoint, invoked by the registry on dispatch
    fn perform_action(&mut self, ctx: &mut CallContext<'_>, input: u64)
        -> Result<u64, PluginError>;
}
