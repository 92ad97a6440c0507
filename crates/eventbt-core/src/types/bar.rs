//! Price bar types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// A single time-stamped OHLCV record for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Close adjusted for splits and dividends
    pub adj_close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar whose adjusted close equals its close.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            adj_close: close,
            volume,
        }
    }

    /// Set the adjusted close.
    pub fn with_adj_close(mut self, adj_close: f64) -> Self {
        self.adj_close = adj_close;
        self
    }

    /// Read a single field.
    #[inline]
    pub fn value(&self, field: BarField) -> f64 {
        match field {
            BarField::Open => self.open,
            BarField::High => self.high,
            BarField::Low => self.low,
            BarField::Close => self.close,
            BarField::AdjClose => self.adj_close,
            BarField::Volume => self.volume,
        }
    }

    /// Get the timestamp as a DateTime. Fails for millisecond values
    /// outside the representable date range.
    pub fn datetime(&self) -> Result<DateTime<Utc>, DataError> {
        DateTime::from_timestamp_millis(self.timestamp).ok_or_else(|| {
            DataError::ParseError(format!("timestamp {} ms is out of range", self.timestamp))
        })
    }

    /// Return the same bar re-stamped at another time.
    pub fn restamped(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A numeric field of a [`Bar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BarField {
    Open,
    High,
    Low,
    Close,
    #[default]
    AdjClose,
    Volume,
}

impl fmt::Display for BarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarField::Open => "open",
            BarField::High => "high",
            BarField::Low => "low",
            BarField::Close => "close",
            BarField::AdjClose => "adj_close",
            BarField::Volume => "volume",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for BarField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(BarField::Open),
            "high" => Ok(BarField::High),
            "low" => Ok(BarField::Low),
            "close" => Ok(BarField::Close),
            "adj_close" | "adj close" | "adjclose" => Ok(BarField::AdjClose),
            "volume" => Ok(BarField::Volume),
            _ => Err(format!("Invalid bar field: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_values() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1_000_000.0).with_adj_close(104.0);

        assert_eq!(bar.value(BarField::Open), 100.0);
        assert_eq!(bar.value(BarField::High), 110.0);
        assert_eq!(bar.value(BarField::Close), 105.0);
        assert_eq!(bar.value(BarField::AdjClose), 104.0);
        assert_eq!(bar.value(BarField::Volume), 1_000_000.0);
    }

    #[test]
    fn test_adj_close_defaults_to_close() {
        let bar = Bar::new(0, 1.0, 2.0, 0.5, 1.5, 10.0);
        assert_eq!(bar.adj_close, 1.5);
    }

    #[test]
    fn test_datetime() {
        let bar = Bar::new(86_400_000, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(bar.datetime().unwrap().timestamp(), 86_400);

        let bar = Bar::new(i64::MAX, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert!(matches!(bar.datetime(), Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("Adj Close".parse::<BarField>().unwrap(), BarField::AdjClose);
        assert_eq!("close".parse::<BarField>().unwrap(), BarField::Close);
        assert!("vwap".parse::<BarField>().is_err());
    }
}
