//! Validate configuration command.

use anyhow::{Context, Result};
use eventbt_config::AppConfig;
use eventbt_strategies::StrategyRegistry;
use std::path::Path;

pub fn run(config_path: Option<&Path>, config: &AppConfig) -> Result<()> {
    match config_path {
        Some(path) => println!("Validating configuration: {}", path.display()),
        None => println!("Validating built-in defaults and environment overrides"),
    }

    // Parameter errors only surface when the strategy is built
    StrategyRegistry::new()
        .create(&config.strategy.name, config.strategy.params_json())
        .with_context(|| format!("Invalid strategy '{}'", config.strategy.name))?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Strategy: {}", config.strategy.name);
    println!("Initial capital: {:.2}", config.backtest.initial_capital);
    println!("Exhaustion policy: {}", config.backtest.exhaustion);
    if config.data.symbols.is_empty() {
        println!("Symbols: none (pass --symbols to backtest)");
    } else {
        println!("Symbols: {}", config.data.symbols.join(", "));
    }
    println!();
    println!("Effective settings:");
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}
