//! Vault ledger plugin
//!
//! Mints one immutable vault record per successful invocation. Ids are
//! allocated sequentially starting at 1 and are never reused; creation
//! timestamps never decrease, even if the system clock steps backwards.
//! Records are never mutated or destroyed after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CallerId;

use super::{CallContext, Notification, Plugin, PluginError};

/// An immutable ledger record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    /// Unique, strictly increasing id (first vault gets 1)
    pub id: u64,

    /// The effective caller that triggered the minting dispatch
    pub owner: CallerId,

    /// Balance supplied at creation
    pub balance: u64,

    /// Creation timestamp, non-decreasing across the ledger
    pub created_at: DateTime<Utc>,
}

/// Stateful plugin minting sequentially-numbered vault records
///
/// `perform_action(balance)` creates one vault owned by the caller, emits a
/// `vault.created` notification carrying the new id, and returns that id.
/// The queries below are read-only and unrestricted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultPlugin {
    vaults: Vec<Vault>,
    next_id: u64,
}

impl Default for VaultPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultPlugin {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self {
            vaults: Vec::new(),
            next_id: 1,
        }
    }

    /// Looks up a vault by id
    pub fn vault(&self, id: u64) -> Option<&Vault> {
        self.vaults.iter().find(|v| v.id == id)
    }

    /// Returns the number of vaults minted so far
    pub fn vault_count(&self) -> usize {
        self.vaults.len()
    }

    /// Returns all vaults in minting order
    pub fn vaults(&self) -> &[Vault] {
        &self.vaults
    }

    fn next_created_at(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.vaults.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        }
    }
}

impl Plugin for VaultPlugin {
    fn name(&self) -> &str {
        "vault"
    }

    fn perform_action(
        &mut self,
        ctx: &mut CallContext<'_>,
        input: u64,
    ) -> Result<u64, PluginError> {
        // next_id of 0 would mean a previous allocation overflowed
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| PluginError::RejectedInput("vault id space exhausted".to_string()))?;

        let vault = Vault {
            id,
            owner: ctx.caller().clone(),
            balance: input,
            created_at: self.next_created_at(),
        };

        ctx.emit(Notification::new(
            "vault.created",
            serde_json::json!({
                "vault_id": vault.id,
                "owner": &vault.owner,
                "balance": vault.balance,
            }),
        ));

        self.vaults.push(vault);

        Ok(id)
    }
}
