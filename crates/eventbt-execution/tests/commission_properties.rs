//! Property tests for the simulated handler's commission schedule.

use chrono::Utc;
use proptest::prelude::*;

use eventbt_core::traits::{CommissionModel, ExecutionHandler};
use eventbt_core::types::{
    CommissionSchedule, Event, OrderEvent, Side, SignalKind, IB_MINIMUM, IB_TIER_THRESHOLD,
};
use eventbt_execution::SimulatedExecutionHandler;

fn fill_commission(quantity: u64, price: f64) -> f64 {
    let mut handler = SimulatedExecutionHandler::new();
    let mut sink: Vec<Event> = Vec::new();
    let order = OrderEvent::market(Utc::now(), "SPY", quantity, Side::Buy, price, SignalKind::Long);
    handler.execute_order(&order, &mut sink).unwrap().commission
}

proptest! {
    #[test]
    fn commission_monotone_in_lower_tier(a in 1u64..=500, b in 1u64..=500, price in 1.0..500.0_f64) {
        let (lo, hi) = (a.min(b), a.max(b));
        prop_assert!(fill_commission(lo, price) <= fill_commission(hi, price));
    }

    #[test]
    fn commission_monotone_in_upper_tier(a in 501u64..100_000, b in 501u64..100_000, price in 1.0..500.0_f64) {
        let (lo, hi) = (a.min(b), a.max(b));
        prop_assert!(fill_commission(lo, price) <= fill_commission(hi, price));
    }

    #[test]
    fn commission_never_below_minimum(quantity in 1u64..100_000) {
        prop_assert!(fill_commission(quantity, 10.0) >= IB_MINIMUM);
    }

    #[test]
    fn commission_independent_of_price(quantity in 1u64..100_000, p1 in 1.0..500.0_f64, p2 in 1.0..500.0_f64) {
        let schedule = CommissionSchedule::InteractiveBrokers;
        prop_assert_eq!(schedule.commission(quantity, p1), schedule.commission(quantity, p2));
    }
}

#[test]
fn tier_boundary_uses_lower_rate() {
    assert!((fill_commission(IB_TIER_THRESHOLD, 1.0) - 6.5).abs() < 1e-12);
    assert!((fill_commission(IB_TIER_THRESHOLD + 1, 1.0) - 4.008).abs() < 1e-12);
}
