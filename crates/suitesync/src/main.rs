/// CLI module - command-line interface for suitesync
mod cli;

/// Environment-based configuration loading
mod config;

/// HTTP implementation of the remote service interface
mod http;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run_cli()
}
