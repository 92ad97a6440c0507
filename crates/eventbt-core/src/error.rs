//! Error types for the backtesting engine.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for TradingError {
    fn from(err: serde_json::Error) -> Self {
        TradingError::Serialization(err.to_string())
    }
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),
}

/// Bar feed and instrument lookup errors.
///
/// A lookback that asks for more bars than are available is not an error:
/// feeds return the shorter sequence instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Lookup against an instrument outside the registered universe.
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("Invalid instrument universe: {0}")]
    InvalidUniverse(String),

    #[error("Timestamps for {symbol} are not monotonically non-decreasing at index {index}")]
    NonMonotonicTimestamps { symbol: String, index: usize },

    #[error("No data available: {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Performance analytics errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The series is too short or has no variance, so the statistic is undefined.
    #[error("Degenerate statistics: {reason}")]
    DegenerateStatistics { reason: String },
}

impl AnalyticsError {
    pub fn degenerate(reason: impl Into<String>) -> Self {
        AnalyticsError::DegenerateStatistics {
            reason: reason.into(),
        }
    }
}
