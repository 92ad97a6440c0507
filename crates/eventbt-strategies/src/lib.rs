//! Strategy implementations.
//!
//! This crate provides:
//! - Moving average cross (long-only, SMA or EMA)
//! - Buy and hold
//! - A registry for creating strategies by name

mod buy_and_hold;
mod ma_crossover;
mod registry;

pub use buy_and_hold::{BuyAndHoldConfig, BuyAndHoldStrategy};
pub use ma_crossover::{MovingAverageCrossConfig, MovingAverageCrossStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
