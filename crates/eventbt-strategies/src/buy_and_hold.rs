//! Buy and hold: one LONG per instrument on its first bar.

use serde::{Deserialize, Serialize};

use eventbt_core::error::TradingError;
use eventbt_core::queue::EventSink;
use eventbt_core::traits::{BarFeed, Strategy};
use eventbt_core::types::{MarketEvent, SignalEvent, SignalKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyAndHoldConfig {
    pub strategy_id: u32,
}

impl Default for BuyAndHoldConfig {
    fn default() -> Self {
        Self { strategy_id: 1 }
    }
}

pub struct BuyAndHoldStrategy {
    config: BuyAndHoldConfig,
    bought: Vec<bool>,
}

impl BuyAndHoldStrategy {
    pub fn new(config: BuyAndHoldConfig) -> Self {
        Self {
            config,
            bought: Vec::new(),
        }
    }
}

impl Strategy for BuyAndHoldStrategy {
    fn name(&self) -> &str {
        "Buy and Hold"
    }

    fn description(&self) -> &str {
        "Buys every instrument on its first bar and never exits"
    }

    fn calculate_signals(
        &mut self,
        _event: &MarketEvent,
        feed: &dyn BarFeed,
        sink: &mut dyn EventSink,
    ) -> Result<(), TradingError> {
        let universe = feed.universe();
        if self.bought.len() != universe.len() {
            self.bought = vec![false; universe.len()];
        }

        for (i, symbol) in universe.iter().enumerate() {
            if self.bought[i] {
                continue;
            }
            let Some(bar) = feed.latest_bar(symbol)? else {
                continue;
            };
            let timestamp = bar.datetime()?;
            self.bought[i] = true;
            sink.push(
                SignalEvent::new(
                    self.config.strategy_id,
                    timestamp,
                    symbol,
                    SignalKind::Long,
                    bar.adj_close,
                )
                .into(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventbt_core::types::{Bar, Event};
    use eventbt_data::HistoricBarFeed;

    #[test]
    fn test_single_entry_per_instrument() {
        let bars = |p: f64| -> Vec<Bar> {
            (0..3).map(|i| Bar::new(i * 1000, p, p, p, p, 1.0)).collect()
        };
        let mut feed = HistoricBarFeed::new(vec![
            ("A".to_string(), bars(10.0)),
            ("B".to_string(), bars(20.0)),
        ])
        .unwrap();
        let mut strategy = BuyAndHoldStrategy::new(BuyAndHoldConfig::default());
        let mut market: Vec<Event> = Vec::new();
        let mut signals: Vec<Event> = Vec::new();

        while feed.has_more() {
            feed.advance(&mut market).unwrap();
            strategy
                .calculate_signals(&MarketEvent, &feed, &mut signals)
                .unwrap();
        }

        assert_eq!(signals.len(), 2);
        match &signals[1] {
            Event::Signal(s) => {
                assert_eq!(s.symbol, "B");
                assert_eq!(s.kind, SignalKind::Long);
                assert_eq!(s.reference_price, 20.0);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
