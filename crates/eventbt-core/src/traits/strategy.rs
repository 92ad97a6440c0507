//! Strategy trait definitions.

use crate::error::TradingError;
use crate::queue::EventSink;
use crate::traits::BarFeed;
use crate::types::MarketEvent;

/// Core strategy trait.
///
/// A strategy reacts to Market events by reading the bar feed and pushing
/// zero or more Signal events onto the sink. Apart from its own bookkeeping
/// (for example whether it is currently long an instrument) it holds no
/// engine state.
pub trait Strategy {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// React to a new bar.
    fn calculate_signals(
        &mut self,
        event: &MarketEvent,
        feed: &dyn BarFeed,
        sink: &mut dyn EventSink,
    ) -> Result<(), TradingError>;

    /// Number of bars before every indicator spans its full window.
    fn warmup_period(&self) -> usize {
        0
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn calculate_signals(
        &mut self,
        event: &MarketEvent,
        feed: &dyn BarFeed,
        sink: &mut dyn EventSink,
    ) -> Result<(), TradingError> {
        (**self).calculate_signals(event, feed, sink)
    }

    fn warmup_period(&self) -> usize {
        (**self).warmup_period()
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}
