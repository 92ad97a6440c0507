//! Bar feed trait definitions.

use chrono::{DateTime, Utc};

use crate::error::DataError;
use crate::queue::EventSink;
use crate::types::{Bar, BarField, Universe};

/// Source of price bars for a closed universe of instruments.
///
/// A feed releases bars step by step. Every step pushes one Market event
/// onto the sink; once no new data exists the feed stops pushing and
/// reports `has_more() == false`. Timestamps are monotonically
/// non-decreasing per instrument.
///
/// Lookbacks asking for more bars than have been released return the
/// shorter available sequence rather than an error.
pub trait BarFeed {
    /// Instruments served by this feed, in valuation order.
    fn universe(&self) -> &Universe;

    /// Whether another call to [`BarFeed::advance`] can release new bars.
    fn has_more(&self) -> bool;

    /// Release the next bar for each instrument and push a Market event,
    /// or mark the feed exhausted without pushing anything.
    fn advance(&mut self, sink: &mut dyn EventSink) -> Result<(), DataError>;

    /// Up to `lookback` most recent released bars, oldest first.
    fn latest_bars(&self, symbol: &str, lookback: usize) -> Result<&[Bar], DataError>;

    /// Most recent released bar.
    fn latest_bar(&self, symbol: &str) -> Result<Option<&Bar>, DataError> {
        Ok(self.latest_bars(symbol, 1)?.last())
    }

    /// Up to `lookback` most recent values of `field`, oldest first.
    fn latest_values(
        &self,
        symbol: &str,
        field: BarField,
        lookback: usize,
    ) -> Result<Vec<f64>, DataError> {
        Ok(self
            .latest_bars(symbol, lookback)?
            .iter()
            .map(|bar| bar.value(field))
            .collect())
    }

    /// Most recent value of `field`.
    fn latest_value(&self, symbol: &str, field: BarField) -> Result<Option<f64>, DataError> {
        Ok(self.latest_bar(symbol)?.map(|bar| bar.value(field)))
    }

    /// Timestamp of the most recent released bar.
    fn latest_timestamp(&self, symbol: &str) -> Result<Option<DateTime<Utc>>, DataError> {
        self.latest_bar(symbol)?.map(|bar| bar.datetime()).transpose()
    }
}
