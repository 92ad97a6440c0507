//! In-memory historic bar feed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use eventbt_core::error::DataError;
use eventbt_core::queue::EventSink;
use eventbt_core::traits::BarFeed;
use eventbt_core::types::{Bar, MarketEvent, Universe};

use crate::align::forward_fill;
use crate::csv_source::load_csv_dir;

/// What happens when instruments run out of history at different times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// Stop for every instrument as soon as one has no next bar.
    #[default]
    Global,
    /// Keep stepping while any instrument has data. Exhausted instruments
    /// keep reporting their last bar.
    PerInstrument,
}

impl fmt::Display for ExhaustionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExhaustionPolicy::Global => write!(f, "global"),
            ExhaustionPolicy::PerInstrument => write!(f, "per_instrument"),
        }
    }
}

impl FromStr for ExhaustionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "global" => Ok(ExhaustionPolicy::Global),
            "per_instrument" => Ok(ExhaustionPolicy::PerInstrument),
            other => Err(format!("unknown exhaustion policy: {}", other)),
        }
    }
}

/// Bar feed over fully loaded, time-sorted series.
///
/// Each [`advance`](BarFeed::advance) releases one bar per instrument and
/// pushes a single Market event. The feed looks one step ahead, so
/// `has_more()` turns false right after the last step that released data.
#[derive(Debug, Clone)]
pub struct HistoricBarFeed {
    universe: Universe,
    series: Vec<Vec<Bar>>,
    /// Number of bars released per instrument
    cursor: Vec<usize>,
    policy: ExhaustionPolicy,
    finished: bool,
    steps: usize,
}

impl HistoricBarFeed {
    /// Build a feed from `(symbol, bars)` pairs. Symbol order defines the
    /// universe order.
    pub fn new(data: Vec<(String, Vec<Bar>)>) -> Result<Self, DataError> {
        let universe = Universe::new(data.iter().map(|(symbol, _)| symbol.clone()))?;

        for (symbol, bars) in &data {
            if let Some(bar) = bars.iter().find(|b| b.datetime().is_err()) {
                return Err(DataError::ParseError(format!(
                    "{}: timestamp {} ms is out of range",
                    symbol, bar.timestamp
                )));
            }
            if let Some(index) = bars
                .windows(2)
                .position(|w| w[1].timestamp < w[0].timestamp)
            {
                return Err(DataError::NonMonotonicTimestamps {
                    symbol: symbol.clone(),
                    index: index + 1,
                });
            }
        }

        let series: Vec<Vec<Bar>> = data.into_iter().map(|(_, bars)| bars).collect();
        let mut feed = Self {
            cursor: vec![0; series.len()],
            universe,
            series,
            policy: ExhaustionPolicy::default(),
            finished: false,
            steps: 0,
        };
        feed.finished = !feed.can_advance();
        Ok(feed)
    }

    /// Load `<dir>/<SYMBOL>.csv` files, optionally aligning them onto a
    /// shared timeline.
    pub fn from_csv_dir(dir: &Path, symbols: &[String], align: bool) -> Result<Self, DataError> {
        let mut data = load_csv_dir(dir, symbols)?;
        if align {
            data = forward_fill(data);
        }
        let feed = Self::new(data)?;
        info!(
            instruments = feed.universe.len(),
            bars = feed.total_bars(),
            aligned = align,
            "Historic feed ready"
        );
        Ok(feed)
    }

    pub fn with_policy(mut self, policy: ExhaustionPolicy) -> Self {
        self.policy = policy;
        self.finished = !self.can_advance();
        self
    }

    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    /// Number of steps released so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Total bars held across all instruments.
    pub fn total_bars(&self) -> usize {
        self.series.iter().map(Vec::len).sum()
    }

    fn has_next(&self, index: usize) -> bool {
        self.cursor[index] < self.series[index].len()
    }

    fn can_advance(&self) -> bool {
        let mut indices = 0..self.series.len();
        match self.policy {
            ExhaustionPolicy::Global => indices.all(|i| self.has_next(i)),
            ExhaustionPolicy::PerInstrument => indices.any(|i| self.has_next(i)),
        }
    }
}

impl BarFeed for HistoricBarFeed {
    fn universe(&self) -> &Universe {
        &self.universe
    }

    fn has_more(&self) -> bool {
        !self.finished
    }

    fn advance(&mut self, sink: &mut dyn EventSink) -> Result<(), DataError> {
        if self.finished || !self.can_advance() {
            self.finished = true;
            return Ok(());
        }

        for i in 0..self.series.len() {
            if self.has_next(i) {
                self.cursor[i] += 1;
            }
        }
        self.steps += 1;
        sink.push(MarketEvent.into());

        self.finished = !self.can_advance();
        if self.finished {
            debug!(steps = self.steps, policy = %self.policy, "Feed exhausted");
        }
        Ok(())
    }

    fn latest_bars(&self, symbol: &str, lookback: usize) -> Result<&[Bar], DataError> {
        let index = self.universe.index_of(symbol)?;
        let end = self.cursor[index];
        let start = end.saturating_sub(lookback);
        Ok(&self.series[index][start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventbt_core::types::{BarField, Event};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64 * 86_400_000, c, c, c, c, 1000.0))
            .collect()
    }

    fn two_instruments() -> Vec<(String, Vec<Bar>)> {
        vec![
            ("AAPL".to_string(), bars(&[1.0, 2.0, 3.0])),
            ("MSFT".to_string(), bars(&[10.0, 20.0])),
        ]
    }

    #[test]
    fn test_three_steps_then_exhausted() {
        let mut feed = HistoricBarFeed::new(vec![("AAPL".to_string(), bars(&[1.0, 2.0, 3.0]))]).unwrap();
        let mut sink: Vec<Event> = Vec::new();

        while feed.has_more() {
            feed.advance(&mut sink).unwrap();
        }

        assert_eq!(sink.len(), 3);
        assert_eq!(feed.steps(), 3);

        // Advancing past the end is a no-op
        feed.advance(&mut sink).unwrap();
        assert_eq!(sink.len(), 3);
    }

    #[test]
    fn test_global_exhaustion() {
        let mut feed = HistoricBarFeed::new(two_instruments()).unwrap();
        let mut sink: Vec<Event> = Vec::new();

        while feed.has_more() {
            feed.advance(&mut sink).unwrap();
        }

        assert_eq!(sink.len(), 2);
        assert_eq!(feed.latest_value("AAPL", BarField::Close).unwrap(), Some(2.0));
    }

    #[test]
    fn test_per_instrument_exhaustion() {
        let mut feed = HistoricBarFeed::new(two_instruments())
            .unwrap()
            .with_policy(ExhaustionPolicy::PerInstrument);
        let mut sink: Vec<Event> = Vec::new();

        while feed.has_more() {
            feed.advance(&mut sink).unwrap();
        }

        assert_eq!(sink.len(), 3);
        assert_eq!(feed.latest_value("AAPL", BarField::Close).unwrap(), Some(3.0));
        // MSFT keeps its last bar
        assert_eq!(feed.latest_value("MSFT", BarField::Close).unwrap(), Some(20.0));
    }

    #[test]
    fn test_lookback_returns_available_bars() {
        let mut feed = HistoricBarFeed::new(two_instruments()).unwrap();
        let mut sink: Vec<Event> = Vec::new();

        assert!(feed.latest_bars("AAPL", 5).unwrap().is_empty());
        assert_eq!(feed.latest_bar("AAPL").unwrap(), None);

        feed.advance(&mut sink).unwrap();
        feed.advance(&mut sink).unwrap();

        assert_eq!(
            feed.latest_values("AAPL", BarField::Close, 5).unwrap(),
            vec![1.0, 2.0]
        );
        assert_eq!(
            feed.latest_values("AAPL", BarField::Close, 1).unwrap(),
            vec![2.0]
        );
        assert_eq!(
            feed.latest_timestamp("MSFT").unwrap().map(|t| t.timestamp_millis()),
            Some(86_400_000)
        );
    }

    #[test]
    fn test_unknown_instrument() {
        let feed = HistoricBarFeed::new(two_instruments()).unwrap();
        assert_eq!(
            feed.latest_bars("GOOG", 1),
            Err(DataError::UnknownInstrument("GOOG".to_string()))
        );
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let mut data = bars(&[1.0, 2.0, 3.0]);
        data.swap(1, 2);
        let result = HistoricBarFeed::new(vec![("AAPL".to_string(), data)]);
        assert_eq!(
            result.unwrap_err(),
            DataError::NonMonotonicTimestamps {
                symbol: "AAPL".to_string(),
                index: 2
            }
        );
    }

    #[test]
    fn test_rejects_out_of_range_timestamp() {
        let mut data = bars(&[1.0, 2.0]);
        data[1] = data[1].restamped(i64::MAX);
        let result = HistoricBarFeed::new(vec![("AAPL".to_string(), data)]);
        assert!(matches!(result, Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_empty_series_has_no_data() {
        let feed = HistoricBarFeed::new(vec![
            ("AAPL".to_string(), bars(&[1.0])),
            ("MSFT".to_string(), Vec::new()),
        ])
        .unwrap();
        assert!(!feed.has_more());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("global".parse::<ExhaustionPolicy>().unwrap(), ExhaustionPolicy::Global);
        assert_eq!(
            "per-instrument".parse::<ExhaustionPolicy>().unwrap(),
            ExhaustionPolicy::PerInstrument
        );
        assert!("sometimes".parse::<ExhaustionPolicy>().is_err());
    }
}
