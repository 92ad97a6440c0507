//! Event model passed between the engine's components.
//!
//! Events are immutable once constructed. The engine dispatches them in
//! strict FIFO order: Market -> Signal -> Order -> Fill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CommissionSchedule;
use crate::traits::CommissionModel;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Get the sign for position calculations (+1 for buy, -1 for sell).
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Direction requested by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Long,
    Short,
    Exit,
}

impl SignalKind {
    /// Whether the signal opens a position rather than closing one.
    pub fn is_entry(&self) -> bool {
        !matches!(self, SignalKind::Exit)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Long => write!(f, "LONG"),
            SignalKind::Short => write!(f, "SHORT"),
            SignalKind::Exit => write!(f, "EXIT"),
        }
    }
}

/// Order type. Only market orders are simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    #[default]
    Market,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MKT"),
        }
    }
}

/// A new bar is available for every tracked instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketEvent;

/// Trading signal emitted by a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub strategy_id: u32,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub kind: SignalKind,
    /// Last known price, used to size the order
    pub reference_price: f64,
    /// Weighting hook for position-sizing policies; unused by the reference policy
    pub strength: f64,
}

impl SignalEvent {
    pub fn new(
        strategy_id: u32,
        timestamp: DateTime<Utc>,
        symbol: impl Into<String>,
        kind: SignalKind,
        reference_price: f64,
    ) -> Self {
        Self {
            strategy_id,
            timestamp,
            symbol: symbol.into(),
            kind,
            reference_price,
            strength: 1.0,
        }
    }

    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

/// Order submitted to the execution handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub kind: OrderKind,
    /// Always positive; direction comes from `side`
    pub quantity: u64,
    pub side: Side,
    pub reference_price: f64,
    pub signal_kind: SignalKind,
}

impl OrderEvent {
    /// Create a market order.
    pub fn market(
        timestamp: DateTime<Utc>,
        symbol: impl Into<String>,
        quantity: u64,
        side: Side,
        reference_price: f64,
        signal_kind: SignalKind,
    ) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            kind: OrderKind::Market,
            quantity,
            side,
            reference_price,
            signal_kind,
        }
    }
}

impl fmt::Display for OrderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order: symbol={}, type={}, quantity={}, side={}, price={:.4}, direction={}",
            self.symbol, self.kind, self.quantity, self.side, self.reference_price, self.signal_kind
        )
    }
}

/// A completed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub quantity: u64,
    pub side: Side,
    pub fill_price: f64,
    pub commission: f64,
}

impl FillEvent {
    /// Create a fill. When `commission` is `None` the Interactive-Brokers-like
    /// schedule is applied.
    pub fn new(
        timestamp: DateTime<Utc>,
        symbol: impl Into<String>,
        quantity: u64,
        side: Side,
        fill_price: f64,
        commission: Option<f64>,
    ) -> Self {
        let commission = commission.unwrap_or_else(|| {
            CommissionSchedule::InteractiveBrokers.commission(quantity, fill_price)
        });
        Self {
            timestamp,
            symbol: symbol.into(),
            quantity,
            side,
            fill_price,
            commission,
        }
    }

    /// Signed cash effect of the trade, excluding commission.
    pub fn signed_notional(&self) -> f64 {
        self.side.sign() as f64 * self.fill_price * self.quantity as f64
    }
}

/// Tag of an [`Event`], used for logging and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Market,
    Signal,
    Order,
    Fill,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Market => write!(f, "MARKET"),
            EventKind::Signal => write!(f, "SIGNAL"),
            EventKind::Order => write!(f, "ORDER"),
            EventKind::Fill => write!(f, "FILL"),
        }
    }
}

/// Tagged event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Market(_) => EventKind::Market,
            Event::Signal(_) => EventKind::Signal,
            Event::Order(_) => EventKind::Order,
            Event::Fill(_) => EventKind::Fill,
        }
    }
}

impl From<MarketEvent> for Event {
    fn from(event: MarketEvent) -> Self {
        Event::Market(event)
    }
}

impl From<SignalEvent> for Event {
    fn from(event: SignalEvent) -> Self {
        Event::Signal(event)
    }
}

impl From<OrderEvent> for Event {
    fn from(event: OrderEvent) -> Self {
        Event::Order(event)
    }
}

impl From<FillEvent> for Event {
    fn from(event: FillEvent) -> Self {
        Event::Fill(event)
    }
}
