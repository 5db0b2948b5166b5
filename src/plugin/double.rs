//! Deterministic transform plugin
//!
//! Returns twice its input. No state, no notifications; exists as the
//! minimal conformance example of the capability interface.

use serde::{Deserialize, Serialize};

use super::{CallContext, Plugin, PluginError};

/// Stateless plugin computing `2 * input`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DoublePlugin;

impl Plugin for DoublePlugin {
    fn name(&self) -> &str {
        "double"
    }

    fn perform_action(
        &mut self,
        _ctx: &mut CallContext<'_>,
        input: u64,
    ) -> Result<u64, PluginError> {
        input
            .checked_mul(2)
            .ok_or_else(|| PluginError::RejectedInput(format!("{input} * 2 overflows u64")))
    }
}
