//! Command-line interface for suitesync.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use suitesync_core::mapping::DEFAULT_MAPPING_FILE;
use suitesync_core::pull::{pull_folder, PullConfig};
use suitesync_core::push::{push_all, PushConfig};
use suitesync_core::run::RunSummary;

use crate::config::Config;
use crate::http::HttpRemote;

/// Exit code for missing required configuration, distinct from generic
/// runtime failure.
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "suitesync")]
#[command(version)]
#[command(
    about = "Keep local test-suite folders in sync with a remote artifact service",
    long_about = None
)]
pub struct Cli {
    /// Directory containing the suite folders
    #[arg(short, long, global = true, default_value = ".")]
    pub base_dir: PathBuf,

    /// Suite mapping file (default: <BASE_DIR>/suite-mapping.json)
    #[arg(short, long, global = true)]
    pub mapping_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror every remote suite into its local folder
    Pull,

    /// Reconcile local folders against the remote service
    Push,
}

/// Main entry point for the CLI
pub fn run_cli() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Fail fast on missing credentials, before any network or filesystem work
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let remote = match HttpRemote::new(&config.api_url, &config.api_key) {
        Ok(remote) => remote,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mapping_file = cli
        .mapping_file
        .unwrap_or_else(|| cli.base_dir.join(DEFAULT_MAPPING_FILE));

    let result = match cli.command {
        Commands::Pull => {
            let folder_id = match config.require_folder_id() {
                Ok(folder_id) => folder_id.to_string(),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::from(EXIT_CONFIG);
                }
            };
            pull_folder(
                &remote,
                &PullConfig {
                    base_dir: cli.base_dir,
                    mapping_file,
                    folder_id,
                },
            )
        }
        Commands::Push => push_all(
            &remote,
            &PushConfig {
                base_dir: cli.base_dir,
                mapping_file,
            },
        ),
    };

    match result {
        Ok(summary) => report(summary),
        Err(e) => {
            log::error!("sync aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Map a run summary to the process exit contract: zero only when no suite
/// failed.
fn report(summary: RunSummary) -> ExitCode {
    if summary.all_ok() {
        log::info!(
            "done: {} suites synced, {} skipped",
            summary.succeeded,
            summary.skipped
        );
        ExitCode::SUCCESS
    } else {
        log::error!(
            "done with failures: {} synced, {} failed, {} skipped",
            summary.succeeded,
            summary.failed,
            summary.skipped
        );
        ExitCode::FAILURE
    }
}
