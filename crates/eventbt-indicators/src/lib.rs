//! Technical indicators used by the bundled strategies.
//!
//! Indicators are batch calculations over a lookback window returned by a
//! bar feed, oldest value first.

pub mod moving_average;

pub use moving_average::{Ema, Sma};
