//! Execution handler trait.

use crate::error::TradingError;
use crate::queue::EventSink;
use crate::types::{FillEvent, OrderEvent, TradeRecord};

/// Converts orders into fills.
///
/// Each order produces exactly one Fill event, pushed onto the sink
/// synchronously. The returned fill is the one that was pushed.
pub trait ExecutionHandler {
    fn execute_order(
        &mut self,
        order: &OrderEvent,
        sink: &mut dyn EventSink,
    ) -> Result<FillEvent, TradingError>;

    /// Trades executed so far, oldest first.
    fn trades(&self) -> &[TradeRecord] {
        &[]
    }

    /// Get the handler name.
    fn name(&self) -> &str;
}
