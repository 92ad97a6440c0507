//! Portfolio bookkeeping.
//!
//! Converts signals into orders through a pluggable order policy, applies
//! fills to the position and holdings ledgers, and records one snapshot per
//! Market event for the performance analytics.

mod ledger;
mod policy;

pub use ledger::{Holdings, Portfolio, PositionSnapshot};
pub use policy::{AllInPolicy, FixedQuantityPolicy, OrderPolicy, OrderPolicyKind};
