//! Core traits for the backtesting engine.

mod bar_feed;
mod commission;
mod execution;
mod indicator;
mod strategy;

pub use bar_feed::BarFeed;
pub use commission::CommissionModel;
pub use execution::ExecutionHandler;
pub use indicator::Indicator;
pub use strategy::Strategy;
