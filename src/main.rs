//! Event-driven backtesting CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use eventbt_config::load_config;
use eventbt_monitor::setup_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = cli
        .log_level
        .map_or(config.logging.level.as_str(), |l| l.as_str());
    let json = cli.json_logs || config.logging.is_json();
    let log_file = cli.log_file.as_deref().or(config.logging.file.as_deref());
    let _guard = setup_logging(level, json, log_file).context("Failed to initialise logging")?;

    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &config),
        Commands::Strategies => cli::commands::strategies::run(),
        Commands::ValidateConfig => cli::commands::validate::run(cli.config.as_deref(), &config),
    }
}
