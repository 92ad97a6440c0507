//! Moving Average Cross Strategy.
//!
//! Goes long when the short moving average rises above the long one and
//! exits when it falls back below. Long-only, one state per instrument.

use serde::{Deserialize, Serialize};
use tracing::debug;

use eventbt_core::error::{StrategyError, TradingError};
use eventbt_core::queue::EventSink;
use eventbt_core::traits::{BarFeed, Indicator, Strategy};
use eventbt_core::types::{BarField, MarketEvent, SignalEvent, SignalKind};
use eventbt_indicators::{Ema, Sma};

/// Configuration for the moving average cross strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageCrossConfig {
    /// Identifier stamped on every signal
    pub strategy_id: u32,
    /// Short moving average window
    pub short_window: usize,
    /// Long moving average window
    pub long_window: usize,
    /// Use EMA instead of SMA
    pub use_ema: bool,
}

impl Default for MovingAverageCrossConfig {
    fn default() -> Self {
        Self {
            strategy_id: 1,
            short_window: 100,
            long_window: 400,
            use_ema: false,
        }
    }
}

impl MovingAverageCrossConfig {
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "Short window must be greater than 0".into(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(StrategyError::InvalidConfig(
                "Short window must be less than long window".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum MovingAverage {
    Simple(Sma),
    Exponential(Ema),
}

impl MovingAverage {
    fn new(period: usize, use_ema: bool) -> Result<Self, StrategyError> {
        let ma = if use_ema {
            Ema::new(period).map(MovingAverage::Exponential)
        } else {
            Sma::new(period).map(MovingAverage::Simple)
        };
        ma.map_err(|e| StrategyError::InvalidConfig(e.to_string()))
    }

    /// Average over the trailing window, or over every available value
    /// while the history is shorter than the window.
    fn latest(&self, values: &[f64]) -> Option<f64> {
        let n = values.len();
        if n == 0 {
            return None;
        }
        match self {
            MovingAverage::Simple(sma) if n >= sma.period() => sma.latest(values),
            MovingAverage::Exponential(ema) if n >= ema.period() => ema.latest(values),
            MovingAverage::Simple(_) => Sma::new(n).ok()?.latest(values),
            MovingAverage::Exponential(_) => Ema::new(n).ok()?.latest(values),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Holding {
    Out,
    Long,
}

/// Moving Average Cross Strategy.
pub struct MovingAverageCrossStrategy {
    config: MovingAverageCrossConfig,
    short_ma: MovingAverage,
    long_ma: MovingAverage,
    /// Indexed by universe position, sized on the first Market event
    holdings: Vec<Holding>,
    signals_generated: usize,
}

impl MovingAverageCrossStrategy {
    /// Create a new strategy, validating the configuration.
    pub fn new(config: MovingAverageCrossConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            short_ma: MovingAverage::new(config.short_window, config.use_ema)?,
            long_ma: MovingAverage::new(config.long_window, config.use_ema)?,
            config,
            holdings: Vec::new(),
            signals_generated: 0,
        })
    }

    pub fn signals_generated(&self) -> usize {
        self.signals_generated
    }
}

impl Strategy for MovingAverageCrossStrategy {
    fn name(&self) -> &str {
        "MA Cross"
    }

    fn description(&self) -> &str {
        "Long when the short moving average is above the long one, out otherwise"
    }

    fn calculate_signals(
        &mut self,
        _event: &MarketEvent,
        feed: &dyn BarFeed,
        sink: &mut dyn EventSink,
    ) -> Result<(), TradingError> {
        let universe = feed.universe();
        if self.holdings.len() != universe.len() {
            self.holdings = vec![Holding::Out; universe.len()];
        }

        for (i, symbol) in universe.iter().enumerate() {
            let values = feed.latest_values(symbol, BarField::AdjClose, self.config.long_window)?;
            let (Some(short), Some(long)) =
                (self.short_ma.latest(&values), self.long_ma.latest(&values))
            else {
                continue;
            };
            let Some(timestamp) = feed.latest_timestamp(symbol)? else {
                continue;
            };
            let price = values[values.len() - 1];

            let kind = match self.holdings[i] {
                Holding::Out if short > long => {
                    self.holdings[i] = Holding::Long;
                    SignalKind::Long
                }
                Holding::Long if short < long => {
                    self.holdings[i] = Holding::Out;
                    SignalKind::Exit
                }
                _ => continue,
            };

            debug!(
                symbol,
                %kind,
                short_ma = short,
                long_ma = long,
                %timestamp,
                "Signal"
            );
            self.signals_generated += 1;
            sink.push(
                SignalEvent::new(self.config.strategy_id, timestamp, symbol, kind, price).into(),
            );
        }

        Ok(())
    }

    fn warmup_period(&self) -> usize {
        self.config.long_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventbt_core::types::{Bar, Event};
    use eventbt_data::HistoricBarFeed;

    fn feed(prices: &[f64]) -> HistoricBarFeed {
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Bar::new(i as i64 * 86_400_000, p, p + 1.0, p - 1.0, p, 1000.0))
            .collect();
        HistoricBarFeed::new(vec![("TEST".to_string(), bars)]).unwrap()
    }

    fn run(strategy: &mut MovingAverageCrossStrategy, prices: &[f64]) -> Vec<SignalEvent> {
        let mut feed = feed(prices);
        let mut queue: Vec<Event> = Vec::new();
        let mut signals = Vec::new();

        while feed.has_more() {
            feed.advance(&mut queue).unwrap();
            for event in queue.drain(..) {
                if let Event::Market(market) = event {
                    let mut emitted: Vec<Event> = Vec::new();
                    strategy
                        .calculate_signals(&market, &feed, &mut emitted)
                        .unwrap();
                    signals.extend(emitted.into_iter().filter_map(|e| match e {
                        Event::Signal(s) => Some(s),
                        _ => None,
                    }));
                }
            }
        }
        signals
    }

    fn small(use_ema: bool) -> MovingAverageCrossStrategy {
        MovingAverageCrossStrategy::new(MovingAverageCrossConfig {
            short_window: 2,
            long_window: 4,
            use_ema,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(MovingAverageCrossConfig::default().validate().is_ok());

        let config = MovingAverageCrossConfig {
            short_window: 30,
            long_window: 20,
            ..Default::default()
        };
        assert!(MovingAverageCrossStrategy::new(config).is_err());

        let config = MovingAverageCrossConfig {
            short_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_signals_on_partial_history() {
        let mut strategy = small(false);
        // Three bars for a four-bar window: long average is the mean of all three
        let signals = run(&mut strategy, &[1.0, 2.0, 3.0]);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Long);
        assert_eq!(signals[0].reference_price, 3.0);
        assert_eq!(strategy.warmup_period(), 4);
    }

    #[test]
    fn test_partial_averages() {
        let sma = MovingAverage::new(4, false).unwrap();
        assert_eq!(sma.latest(&[]), None);
        assert_eq!(sma.latest(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(sma.latest(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.5));

        let ema = MovingAverage::new(4, true).unwrap();
        assert_eq!(ema.latest(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn test_flat_history_stays_out() {
        let mut strategy = small(false);
        assert!(run(&mut strategy, &[5.0, 5.0, 5.0, 5.0, 5.0]).is_empty());
    }

    #[test]
    fn test_long_then_exit() {
        let mut strategy = small(false);
        let prices = [10.0, 10.0, 10.0, 10.0, 12.0, 14.0, 16.0, 12.0, 8.0, 6.0];

        let signals = run(&mut strategy, &prices);
        let kinds: Vec<SignalKind> = signals.iter().map(|s| s.kind).collect();

        assert_eq!(kinds, vec![SignalKind::Long, SignalKind::Exit]);
        // Entered on the 12.0 bar, priced at the adjusted close
        assert_eq!(signals[0].reference_price, 12.0);
        assert_eq!(signals[0].symbol, "TEST");
        assert_eq!(signals[0].strategy_id, 1);
        assert_eq!(strategy.signals_generated(), 2);
    }

    #[test]
    fn test_no_repeat_long() {
        let mut strategy = small(true);
        let prices: Vec<f64> = (1..=20).map(|i| i as f64).collect();

        let signals = run(&mut strategy, &prices);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Long);
    }
}
