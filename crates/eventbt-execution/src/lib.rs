//! Order execution.
//!
//! The simulated handler fills every order in full at its reference price
//! and keeps a journal of the resulting trades.

mod journal;
mod simulated;

pub use journal::TradeJournal;
pub use simulated::SimulatedExecutionHandler;
