//! Simulated execution handler for backtesting.

use tracing::debug;

use eventbt_core::error::TradingError;
use eventbt_core::queue::EventSink;
use eventbt_core::traits::{CommissionModel, ExecutionHandler};
use eventbt_core::types::{CommissionSchedule, FillEvent, OrderEvent, TradeRecord};

use crate::journal::TradeJournal;

/// Fills every order immediately and in full at its reference price.
///
/// No slippage, no latency. Commission comes from the configured model.
pub struct SimulatedExecutionHandler<C: CommissionModel = CommissionSchedule> {
    commission: C,
    journal: TradeJournal,
}

impl SimulatedExecutionHandler<CommissionSchedule> {
    /// Create a handler with the Interactive-Brokers-like schedule.
    pub fn new() -> Self {
        Self::with_commission(CommissionSchedule::default())
    }
}

impl Default for SimulatedExecutionHandler<CommissionSchedule> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CommissionModel> SimulatedExecutionHandler<C> {
    pub fn with_commission(commission: C) -> Self {
        Self {
            commission,
            journal: TradeJournal::new(),
        }
    }

    pub fn commission_model(&self) -> &C {
        &self.commission
    }
}

impl<C: CommissionModel> ExecutionHandler for SimulatedExecutionHandler<C> {
    fn execute_order(
        &mut self,
        order: &OrderEvent,
        sink: &mut dyn EventSink,
    ) -> Result<FillEvent, TradingError> {
        if order.quantity == 0 {
            return Err(TradingError::Internal(format!(
                "order for {} has zero quantity",
                order.symbol
            )));
        }

        let price = order.reference_price;
        let commission = self.commission.commission(order.quantity, price);
        let fill = FillEvent::new(
            order.timestamp,
            order.symbol.clone(),
            order.quantity,
            order.side,
            price,
            Some(commission),
        );

        let trade = self.journal.record(order, &fill);
        debug!(
            symbol = %trade.symbol,
            direction = %trade.direction,
            quantity = trade.quantity,
            price = trade.price,
            commission = trade.commission,
            realized_pnl = ?trade.realized_pnl,
            "Order filled"
        );

        sink.push(fill.clone().into());
        Ok(fill)
    }

    fn trades(&self) -> &[TradeRecord] {
        self.journal.records()
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
