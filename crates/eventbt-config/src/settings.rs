//! Configuration structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use eventbt_core::types::CommissionSchedule;
use eventbt_data::ExhaustionPolicy;
use eventbt_portfolio::OrderPolicyKind;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
}

impl AppConfig {
    /// Reject values no run could start with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let b = &self.backtest;
        if !(b.initial_capital.is_finite() && b.initial_capital > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "backtest.initial_capital must be positive, got {}",
                b.initial_capital
            )));
        }
        if b.periods_per_year == 0 {
            return Err(SettingsError::Invalid(
                "backtest.periods_per_year must be positive".into(),
            ));
        }
        if let CommissionSchedule::PerShare { rate, minimum } = b.commission {
            if rate < 0.0 || minimum < 0.0 {
                return Err(SettingsError::Invalid(
                    "backtest.commission rate and minimum must be non-negative".into(),
                ));
            }
        }
        if let OrderPolicyKind::Fixed { quantity: 0 } = b.order_policy {
            return Err(SettingsError::Invalid(
                "backtest.order_policy quantity must be positive".into(),
            ));
        }
        if self.strategy.name.trim().is_empty() {
            return Err(SettingsError::Invalid("strategy.name is empty".into()));
        }
        Ok(())
    }

    /// Symbols from the command line win over the file; one of the two must
    /// name at least one instrument.
    pub fn resolve_symbols(&self, overrides: &[String]) -> Result<Vec<String>, SettingsError> {
        let symbols = if overrides.is_empty() {
            &self.data.symbols
        } else {
            overrides
        };
        if symbols.is_empty() {
            return Err(SettingsError::Invalid(
                "no symbols configured (set data.symbols or pass --symbols)".into(),
            ));
        }
        Ok(symbols.iter().map(|s| s.trim().to_uppercase()).collect())
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "eventbt".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Backtest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub initial_capital: f64,
    pub start_date: NaiveDate,
    /// Pause between feed steps, in milliseconds
    pub heartbeat_ms: u64,
    /// Annualisation factor for the Sharpe ratio
    pub periods_per_year: u32,
    pub commission: CommissionSchedule,
    pub exhaustion: ExhaustionPolicy,
    pub order_policy: OrderPolicyKind,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            start_date: NaiveDate::from_ymd_opt(2015, 5, 1).unwrap_or_default(),
            heartbeat_ms: 0,
            periods_per_year: 252,
            commission: CommissionSchedule::default(),
            exhaustion: ExhaustionPolicy::default(),
            order_policy: OrderPolicyKind::default(),
        }
    }
}

/// Historical data location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding one `SYMBOL.csv` per instrument
    pub csv_dir: PathBuf,
    pub symbols: Vec<String>,
    /// Align instruments onto one timeline, carrying the last bar forward
    pub forward_fill: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from("data"),
            symbols: Vec::new(),
            forward_fill: true,
        }
    }
}

/// Strategy selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    /// Registry key, e.g. `ma_cross`
    pub name: String,
    /// Strategy-specific parameters; missing keys take the strategy defaults
    pub params: BTreeMap<String, serde_json::Value>,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: "ma_cross".to_string(),
            params: BTreeMap::new(),
        }
    }
}

impl StrategySettings {
    pub fn params_json(&self) -> serde_json::Value {
        serde_json::Value::Object(self.params.clone().into_iter().collect())
    }
}
