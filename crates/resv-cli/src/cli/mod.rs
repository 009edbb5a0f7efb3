//! CLI for the resv capacity-reservation tool.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use resv_core::config;

use commands::{run_show_config, run_simulate, SimulateArgs};

/// Top-level CLI for the resv capacity-reservation tool.
#[derive(Debug, Parser)]
#[command(name = "resv")]
#[command(about = "resv: acquire compute capacity reservations with bounded retry", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run an acquisition against the simulated provider.
    Simulate(SimulateArgs),

    /// Show the effective configuration and where it was loaded from.
    ShowConfig,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Simulate(args) => run_simulate(&cfg, args).await?,
            CliCommand::ShowConfig => run_show_config(&cfg)?,
        }

        Ok(())
    }
}
