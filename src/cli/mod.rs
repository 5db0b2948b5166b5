//! Command-line interface for Switchboard

mod app;
mod output;
mod registry_cmd;
mod session;
mod vault_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use session::Session;
