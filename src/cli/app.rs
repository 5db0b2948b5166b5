//! Main CLI application structure

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::session::Session;
use super::{registry_cmd, vault_cmd};
use crate::domain::CallerId;
use crate::storage::{Workspace, WorkspaceConfig};

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(author, version, about = "Owner-controlled plugin dispatch registry")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Caller identity for this command (defaults to config, then $SWITCHBOARD_CALLER, then $USER)
    #[arg(long, global = true)]
    pub caller: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new switchboard workspace
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Administrator identity (defaults to the effective caller)
        #[arg(long)]
        admin: Option<String>,
    },

    /// Register a built-in plugin (admin-only)
    Add {
        /// Plugin name: double or vault
        name: String,
    },

    /// Remove the plugin at a position (admin-only)
    ///
    /// The last plugin moves into the vacated position, so positions of
    /// other plugins may change.
    Remove {
        /// Position of the plugin to remove
        position: usize,
    },

    /// List registered plugins
    List,

    /// Show the number of registered plugins
    Count,

    /// Dispatch to the plugin at a position
    Exec {
        /// Position of the plugin to invoke
        position: usize,

        /// Numeric input passed to the plugin
        input: u64,
    },

    /// Transfer registry administration to another identity (admin-only)
    TransferAdmin {
        /// The new administrator identity
        new_admin: String,
    },

    /// Query the vault ledger
    #[command(subcommand)]
    Vault(vault_cmd::VaultCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    match cli.command {
        Commands::Init { path, admin } => {
            let config = WorkspaceConfig::load(Path::new(&path)).unwrap_or_default();
            let admin = admin
                .map(CallerId::new)
                .unwrap_or_else(|| config.effective_caller(cli.caller.as_deref()));

            output.verbose(&format!("Initializing workspace with admin '{}'", admin));
            let workspace = Workspace::init(&path, admin)?;
            output.success(&format!(
                "Initialized switchboard workspace at {}",
                workspace.root().display()
            ));
        }

        command => {
            let mut session = Session::open_current()?;
            let caller = session
                .workspace()
                .config()
                .effective_caller(cli.caller.as_deref());
            output.verbose(&format!("Acting as caller '{}'", caller));

            match command {
                Commands::Init { .. } => unreachable!("handled above"),
                Commands::Add { name } => {
                    registry_cmd::add(&output, &mut session, &caller, &name)?
                }
                Commands::Remove { position } => {
                    registry_cmd::remove(&output, &mut session, &caller, position)?
                }
                Commands::List => registry_cmd::list(&output, &session)?,
                Commands::Count => registry_cmd::count(&output, &session)?,
                Commands::Exec { position, input } => {
                    registry_cmd::exec(&output, &session, &caller, position, input)?
                }
                Commands::TransferAdmin { new_admin } => registry_cmd::transfer_admin(
                    &output,
                    &session,
                    &caller,
                    CallerId::new(new_admin),
                )?,
                Commands::Vault(cmd) => vault_cmd::run(cmd, &output, &session)?,
            }
        }
    }

    Ok(())
}
