//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use eventbt_data::ExhaustionPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eventbt")]
#[command(author, version, about = "Event-driven market backtesting engine")]
pub struct Cli {
    /// Configuration file path; defaults and EVENTBT__* variables apply without one
    #[arg(short, long, env = "EVENTBT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a backtest over historical CSV data
    Backtest(BacktestArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration and print the effective settings
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Strategy to backtest (see `eventbt strategies`)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Strategy parameters as a JSON object, e.g. '{"short_window":20}'
    #[arg(long)]
    pub params: Option<String>,

    /// Symbols to trade (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Directory containing one CSV file per symbol
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Initial capital
    #[arg(long)]
    pub capital: Option<f64>,

    /// Pause between bars, in milliseconds
    #[arg(long)]
    pub heartbeat_ms: Option<u64>,

    /// Exhaustion policy (global, per-instrument)
    #[arg(long)]
    pub exhaustion: Option<ExhaustionPolicy>,

    /// Do not align instruments onto a shared timeline
    #[arg(long)]
    pub no_forward_fill: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON report to file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,

    /// Write the trade journal as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,
}
