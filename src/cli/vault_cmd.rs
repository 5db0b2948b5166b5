//! Vault ledger query commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use super::session::Session;

#[derive(Subcommand)]
pub enum VaultCommands {
    /// Show a vault by id
    Show {
        /// Vault id
        id: u64,
    },

    /// Show the number of vaults minted so far
    Count,
}

pub fn run(cmd: VaultCommands, output: &Output, session: &Session) -> Result<()> {
    let ledger = session
        .vault_ledger()
        .ok_or_else(|| anyhow::anyhow!("Vault plugin is not registered"))?;

    match cmd {
        VaultCommands::Show { id } => {
            let ledger = ledger.borrow();
            let vault = ledger
                .vault(id)
                .ok_or_else(|| anyhow::anyhow!("No vault with id {}", id))?;

            if output.is_json() {
                output.data(vault);
            } else {
                println!("Vault {}", vault.id);
                println!("  owner: {}", vault.owner);
                println!("  balance: {}", vault.balance);
                println!("  created_at: {}", vault.created_at.to_rfc3339());
            }
        }

        VaultCommands::Count => {
            let count = ledger.borrow().vault_count();

            if output.is_json() {
                output.data(&serde_json::json!({ "count": count }));
            } else {
                println!("{}", count);
            }
        }
    }

    Ok(())
}
