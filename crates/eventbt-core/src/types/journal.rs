//! Trade journal records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Side, SignalKind};

/// Record of a single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub direction: SignalKind,
    pub side: Side,
    pub quantity: u64,
    pub price: f64,
    pub commission: f64,
    /// Realized profit/loss, set on closing trades only
    pub realized_pnl: Option<f64>,
    /// Realized profit/loss relative to the average entry price
    pub realized_pnl_pct: Option<f64>,
}

impl TradeRecord {
    pub fn is_closing(&self) -> bool {
        self.realized_pnl.is_some()
    }
}
