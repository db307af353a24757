//! # hitdetect CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading, overrides and validation
//! - CSV replay and synthetic simulation through the hit detector
//! - Graceful shutdown handling

mod cli;
mod commands;
mod error;
mod pipeline;
mod settings;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_replay, run_simulate, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(logging_config(&cli))?;

    info!(version = env!("CARGO_PKG_VERSION"), "hitdetect starting");

    let result = match &cli.command {
        Commands::Run(args) => run_replay(args).await,
        Commands::Simulate(args) => run_simulate(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Map CLI verbosity flags onto the tracing setup
fn logging_config(cli: &Cli) -> ObservabilityConfig {
    let (level, ignore_env) = if cli.quiet {
        ("warn", true)
    } else {
        let level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        (level, false)
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        default_log_level: level.to_string(),
        ignore_env,
    }
}
