//! Switchboard CLI - owner-controlled plugin dispatch registry

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = switchboard::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
