//! Backtest command implementation.

use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, TimeZone, Utc};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

use eventbt_backtest::{Backtest, BacktestConfig};
use eventbt_config::AppConfig;
use eventbt_data::HistoricBarFeed;
use eventbt_execution::SimulatedExecutionHandler;
use eventbt_strategies::StrategyRegistry;

use crate::cli::{BacktestArgs, OutputFormat};

pub fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    let symbols = config.resolve_symbols(&args.symbols)?;
    let strategy_key = args.strategy.as_deref().unwrap_or(&config.strategy.name);
    let params = match &args.params {
        Some(raw) => serde_json::from_str(raw).context("--params is not valid JSON")?,
        None => config.strategy.params_json(),
    };

    info!(strategy = strategy_key, symbols = ?symbols, "Starting backtest");

    let registry = StrategyRegistry::new();
    let strategy = registry
        .create(strategy_key, params)
        .context("Failed to create strategy")?;

    let data_dir = args.data.as_deref().unwrap_or(&config.data.csv_dir);
    if !data_dir.is_dir() {
        bail!(
            "Data directory '{}' does not exist. Provide a directory of <SYMBOL>.csv files (e.g. --data ./data)",
            data_dir.display()
        );
    }
    let forward_fill = config.data.forward_fill && !args.no_forward_fill;
    let feed = HistoricBarFeed::from_csv_dir(data_dir, &symbols, forward_fill)
        .context("Failed to load market data")?
        .with_policy(args.exhaustion.unwrap_or(config.backtest.exhaustion));

    let settings = &config.backtest;
    let start = args.start.unwrap_or(settings.start_date);
    let capital = args.capital.unwrap_or(settings.initial_capital);
    if !(capital.is_finite() && capital > 0.0) {
        bail!("Initial capital must be positive, got {}", capital);
    }
    let backtest_config = BacktestConfig {
        initial_capital: capital,
        start_date: Utc.from_utc_datetime(&start.and_time(NaiveTime::default())),
        heartbeat_ms: args.heartbeat_ms.unwrap_or(settings.heartbeat_ms),
        periods_per_year: settings.periods_per_year,
    };

    let mut backtest = Backtest::with_policy(
        backtest_config,
        feed,
        strategy,
        SimulatedExecutionHandler::with_commission(settings.commission),
        settings.order_policy,
    );
    let report = backtest.run().context("Backtest aborted")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(path) = &args.save {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    if let Some(path) = &args.equity_csv {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        report.write_equity_csv(BufWriter::new(file))?;
        info!(path = %path.display(), rows = report.equity_curve.len(), "Equity curve written");
    }

    if let Some(path) = &args.trades_csv {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        report.write_trades_csv(BufWriter::new(file))?;
        info!(path = %path.display(), trades = report.trades.len(), "Trade journal written");
    }

    Ok(())
}
