//! Core data types for the backtesting engine.

mod bar;
mod commission;
mod event;
mod instrument;
mod journal;

pub use bar::{Bar, BarField};
pub use commission::{
    CommissionSchedule, IB_HIGH_VOLUME_RATE, IB_LOW_VOLUME_RATE, IB_MINIMUM, IB_TIER_THRESHOLD,
};
pub use event::{
    Event, EventKind, FillEvent, MarketEvent, OrderEvent, OrderKind, Side, SignalEvent,
    SignalKind,
};
pub use instrument::Universe;
pub use journal::TradeRecord;
