//! Core types and traits for the backtesting engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarField) and the closed instrument universe
//! - The event model (Market, Signal, Order, Fill) and the FIFO event queue
//! - Commission schedules and trade-journal records
//! - Contracts for bar feeds, strategies, execution handlers and indicators

pub mod error;
pub mod queue;
pub mod traits;
pub mod types;

pub use error::{AnalyticsError, DataError, TradingError};
pub use queue::{EventQueue, EventSink};
pub use traits::*;
pub use types::*;
