//! Commission schedules.

use serde::{Deserialize, Serialize};

use crate::traits::CommissionModel;

/// Minimum charge per order under the Interactive-Brokers-like schedule.
pub const IB_MINIMUM: f64 = 1.3;
/// Per-share rate up to and including [`IB_TIER_THRESHOLD`] shares.
pub const IB_LOW_VOLUME_RATE: f64 = 0.013;
/// Per-share rate above [`IB_TIER_THRESHOLD`] shares.
pub const IB_HIGH_VOLUME_RATE: f64 = 0.008;
pub const IB_TIER_THRESHOLD: u64 = 500;

/// Built-in commission schedules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommissionSchedule {
    /// `max(1.3, rate * quantity)`, rate 0.013 up to 500 shares, 0.008 above
    #[default]
    InteractiveBrokers,
    /// No commission
    Zero,
    /// `max(minimum, rate * quantity)`
    PerShare { rate: f64, minimum: f64 },
}

impl CommissionModel for CommissionSchedule {
    fn commission(&self, quantity: u64, _price: f64) -> f64 {
        match self {
            CommissionSchedule::InteractiveBrokers => {
                let rate = if quantity <= IB_TIER_THRESHOLD {
                    IB_LOW_VOLUME_RATE
                } else {
                    IB_HIGH_VOLUME_RATE
                };
                IB_MINIMUM.max(rate * quantity as f64)
            }
            CommissionSchedule::Zero => 0.0,
            CommissionSchedule::PerShare { rate, minimum } => minimum.max(rate * quantity as f64),
        }
    }

    fn name(&self) -> &str {
        match self {
            CommissionSchedule::InteractiveBrokers => "interactive_brokers",
            CommissionSchedule::Zero => "zero",
            CommissionSchedule::PerShare { .. } => "per_share",
        }
    }
}
