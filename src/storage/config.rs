//! Configuration handling for the Switchboard CLI
//!
//! Configuration is stored in `.switchboard/config.toml` inside the
//! workspace. It only carries CLI conveniences; the authoritative registry
//! state (including the administrator identity) lives in the snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::CallerId;

/// Workspace-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Default caller identity (overridden by `--caller`)
    pub caller: Option<String>,
}

impl WorkspaceConfig {
    /// Loads configuration from a workspace root, falling back to defaults
    pub fn load(workspace_root: &Path) -> Result<Self> {
        let config_path = workspace_root.join(".switchboard").join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))
    }

    /// Resolves the effective caller identity
    ///
    /// Precedence: explicit flag, then config, then `$SWITCHBOARD_CALLER`,
    /// then `$USER`, then `anonymous`.
    pub fn effective_caller(&self, flag: Option<&str>) -> CallerId {
        let name = flag
            .map(str::to_string)
            .or_else(|| self.caller.clone())
            .or_else(|| std::env::var("SWITCHBOARD_CALLER").ok())
            .or_else(|| std::env::var("USER").ok())
            .unwrap_or_else(|| "anonymous".to_string());

        CallerId::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_falls_back_to_default() {
        let dir = TempDir::new().unwrap();

        let config = WorkspaceConfig::load(dir.path()).unwrap();
        assert!(config.caller.is_none());
    }

    #[test]
    fn parse_config() {
        let config: WorkspaceConfig = toml::from_str("caller = \"alice\"").unwrap();

        assert_eq!(config.caller.as_deref(), Some("alice"));
    }

    #[test]
    fn flag_wins_over_config() {
        let config = WorkspaceConfig {
            caller: Some("alice".to_string()),
        };

        assert_eq!(
            config.effective_caller(Some("bob")),
            CallerId::new("bob")
        );
        assert_eq!(config.effective_caller(None), CallerId::new("alice"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let sw = dir.path().join(".switchboard");
        fs::create_dir_all(&sw).unwrap();
        fs::write(sw.join("config.toml"), "caller = [not toml").unwrap();

        assert!(WorkspaceConfig::load(dir.path()).is_err());
    }
}
