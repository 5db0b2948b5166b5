//! Workspace persistence for the Switchboard CLI
//!
//! The library registry is purely in-memory; this layer exists so the CLI
//! can carry registry contents across invocations. A workspace is a
//! directory with a `.switchboard/` folder holding a TOML config and a
//! JSON snapshot of the registry.

mod config;
mod state;
mod workspace;

pub use config::WorkspaceConfig;
pub use state::{Snapshot, StateStore};
pub use workspace::{Workspace, WorkspaceError};
