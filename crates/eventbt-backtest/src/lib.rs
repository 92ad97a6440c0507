//! Backtesting engine.
//!
//! The engine drains a single FIFO event queue per feed step and hands the
//! finished holdings history to the performance analytics.

mod engine;
mod equity;
pub mod performance;
mod report;
mod statistics;

pub use engine::{Backtest, BacktestConfig, DispatchCounters};
pub use equity::{EquityCurve, EquityRow};
pub use performance::{drawdowns, sharpe_ratio, Drawdowns, DEFAULT_PERIODS_PER_YEAR};
pub use report::BacktestReport;
pub use statistics::BacktestStats;
