//! Workspace management
//!
//! Handles workspace initialization and provides access to the config and
//! the registry snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::CallerId;

use super::{Snapshot, StateStore, WorkspaceConfig};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a switchboard workspace. Run 'switchboard init' first.")]
    NotInWorkspace,
}

/// A Switchboard workspace
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let switchboard_dir = root.join(".switchboard");

        if !switchboard_dir.is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = WorkspaceConfig::load(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Self::find_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a new workspace at the given path
    ///
    /// Creates `.switchboard/` with a default config and an empty registry
    /// snapshot administered by `admin`. Idempotent: an existing snapshot
    /// (and its admin) is left untouched.
    pub fn init(root: impl Into<PathBuf>, admin: CallerId) -> Result<Self> {
        let root = root.into();
        let switchboard_dir = root.join(".switchboard");

        fs::create_dir_all(&switchboard_dir).with_context(|| {
            format!(
                "Failed to create .switchboard directory: {}",
                switchboard_dir.display()
            )
        })?;

        let config_path = switchboard_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Switchboard configuration

# Default caller identity for commands (overridden by --caller)
# caller = "alice"
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let store = StateStore::for_workspace(&root);
        if !store.exists() {
            store.save(&Snapshot::empty(admin))?;
        }

        Self::open(root)
    }

    /// Finds the workspace root by looking for `.switchboard/` upwards
    pub fn find_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".switchboard").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .switchboard directory path
    pub fn switchboard_dir(&self) -> PathBuf {
        self.root.join(".switchboard")
    }

    /// Returns the configuration
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Returns the registry snapshot store
    pub fn state_store(&self) -> StateStore {
        StateStore::for_workspace(&self.root)
    }
}
