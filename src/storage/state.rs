//! JSON snapshot storage for registry state
//!
//! The registry is persisted in `.switchboard/registry.json` as one JSON
//! document: the administrator identity plus the ordered plugin states.
//! Uses file locking for concurrent access safety and writes through a
//! temp file with an atomic rename.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::CallerId;
use crate::plugin::builtin::PluginState;

/// Persistent form of the registry: admin identity plus plugins in
/// positional order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// The configured administrator identity
    pub admin: CallerId,

    /// Plugin states, index == registry position
    pub plugins: Vec<PluginState>,
}

impl Snapshot {
    /// An empty registry administered by `admin`
    pub fn empty(admin: CallerId) -> Self {
        Self {
            admin,
            plugins: Vec::new(),
        }
    }
}

/// Store for the registry snapshot
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a workspace
    pub fn for_workspace(workspace_root: &Path) -> Self {
        Self::new(workspace_root.join(".switchboard").join("registry.json"))
    }

    /// Returns the path to the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a snapshot has been written
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the snapshot
    pub fn load(&self) -> Result<Snapshot> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open registry state: {}", self.path.display()))?;

        // Shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on registry state")?;

        let reader = BufReader::new(&file);
        let snapshot = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse registry state: {}", self.path.display()))?;

        // Lock is released when the file is dropped
        Ok(snapshot)
    }

    /// Writes the snapshot (full rewrite)
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on registry state")?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, snapshot)
                .context("Failed to serialize registry state")?;
            writer.flush().context("Failed to flush registry state")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}
