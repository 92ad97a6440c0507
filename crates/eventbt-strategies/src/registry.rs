//! Strategy registry for creating strategies by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use eventbt_core::{error::StrategyError, traits::Strategy};

use crate::{
    BuyAndHoldConfig, BuyAndHoldStrategy, MovingAverageCrossConfig, MovingAverageCrossStrategy,
};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub key: String,
    /// Strategy name
    pub name: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry for available strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

fn parse<T: serde::de::DeserializeOwned + Default>(
    params: serde_json::Value,
) -> Result<T, StrategyError> {
    if params.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(params).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let mut strategies = BTreeMap::new();

        strategies.insert(
            "ma_cross".to_string(),
            StrategyInfo {
                key: "ma_cross".to_string(),
                name: "MA Cross".to_string(),
                description: "Long when the short moving average is above the long one"
                    .to_string(),
                default_config: serde_json::to_value(MovingAverageCrossConfig::default())
                    .unwrap_or_default(),
            },
        );

        strategies.insert(
            "buy_and_hold".to_string(),
            StrategyInfo {
                key: "buy_and_hold".to_string(),
                name: "Buy and Hold".to_string(),
                description: "Buys every instrument on its first bar".to_string(),
                default_config: serde_json::to_value(BuyAndHoldConfig::default())
                    .unwrap_or_default(),
            },
        );

        Self { strategies }
    }

    /// List all available strategies, ordered by key.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by key.
    pub fn get(&self, key: &str) -> Option<&StrategyInfo> {
        self.strategies.get(key)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    /// Create a strategy from JSON parameters. `null` means defaults;
    /// missing fields fall back to their defaults.
    pub fn create(
        &self,
        key: &str,
        params: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        match key {
            "ma_cross" => {
                let config: MovingAverageCrossConfig = parse(params)?;
                Ok(Box::new(MovingAverageCrossStrategy::new(config)?))
            }
            "buy_and_hold" => {
                let config: BuyAndHoldConfig = parse(params)?;
                Ok(Box::new(BuyAndHoldStrategy::new(config)))
            }
            _ => Err(StrategyError::NotFound(key.to_string())),
        }
    }

    /// Create a strategy with default configuration.
    pub fn create_default(&self, key: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        self.create(key, serde_json::Value::Null)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
