//! Position and holdings ledgers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use eventbt_core::error::DataError;
use eventbt_core::queue::EventSink;
use eventbt_core::traits::BarFeed;
use eventbt_core::types::{BarField, FillEvent, OrderEvent, SignalEvent, Universe};

use crate::policy::{AllInPolicy, OrderPolicy};

/// Signed share count per instrument at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub timestamp: DateTime<Utc>,
    /// Indexed by universe position
    pub quantities: Vec<i64>,
}

/// Cash, commission and mark-to-market values.
///
/// `total` is `cash + Σ market_values` as of the last valuation; fills
/// change `cash` immediately but values only at the next valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holdings {
    pub timestamp: DateTime<Utc>,
    pub cash: f64,
    /// Cumulative commission paid
    pub commission: f64,
    /// Indexed by universe position
    pub market_values: Vec<f64>,
    pub total: f64,
}

impl Holdings {
    fn initial(timestamp: DateTime<Utc>, capital: f64, instruments: usize) -> Self {
        Self {
            timestamp,
            cash: capital,
            commission: 0.0,
            market_values: vec![0.0; instruments],
            total: capital,
        }
    }
}

/// Portfolio ledger over a closed instrument universe.
#[derive(Debug, Clone)]
pub struct Portfolio<P: OrderPolicy = AllInPolicy> {
    universe: Universe,
    policy: P,
    initial_capital: f64,
    current_positions: Vec<i64>,
    current_holdings: Holdings,
    all_positions: Vec<PositionSnapshot>,
    all_holdings: Vec<Holdings>,
}

impl Portfolio<AllInPolicy> {
    /// Create a portfolio with all-in order sizing.
    pub fn new(universe: Universe, start_date: DateTime<Utc>, initial_capital: f64) -> Self {
        Self::with_policy(universe, AllInPolicy, start_date, initial_capital)
    }
}

impl<P: OrderPolicy> Portfolio<P> {
    pub fn with_policy(
        universe: Universe,
        policy: P,
        start_date: DateTime<Utc>,
        initial_capital: f64,
    ) -> Self {
        let n = universe.len();
        let current_holdings = Holdings::initial(start_date, initial_capital, n);
        Self {
            policy,
            initial_capital,
            current_positions: vec![0; n],
            all_positions: vec![PositionSnapshot {
                timestamp: start_date,
                quantities: vec![0; n],
            }],
            all_holdings: vec![current_holdings.clone()],
            current_holdings,
            universe,
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Current signed position for `symbol`.
    pub fn position(&self, symbol: &str) -> Result<i64, DataError> {
        Ok(self.current_positions[self.universe.index_of(symbol)?])
    }

    pub fn current_positions(&self) -> &[i64] {
        &self.current_positions
    }

    pub fn current_holdings(&self) -> &Holdings {
        &self.current_holdings
    }

    /// Position history; the first entry is the start date.
    pub fn all_positions(&self) -> &[PositionSnapshot] {
        &self.all_positions
    }

    /// Holdings history; the first entry is the start date.
    pub fn all_holdings(&self) -> &[Holdings] {
        &self.all_holdings
    }

    /// Value every position at the latest adjusted close and append one
    /// position and one holdings snapshot.
    ///
    /// The snapshot is stamped with the most recent bar time across the
    /// universe. An instrument with no released bar keeps its previous value.
    pub fn mark_to_market(&mut self, feed: &dyn BarFeed) -> Result<(), DataError> {
        let mut timestamp: Option<DateTime<Utc>> = None;

        for (i, symbol) in self.universe.iter().enumerate() {
            if let Some(ts) = feed.latest_timestamp(symbol)? {
                timestamp = Some(timestamp.map_or(ts, |t| t.max(ts)));
            }
            if let Some(price) = feed.latest_value(symbol, BarField::AdjClose)? {
                self.current_holdings.market_values[i] = self.current_positions[i] as f64 * price;
            }
        }

        let timestamp = timestamp.unwrap_or(self.current_holdings.timestamp);
        let market_value: f64 = self.current_holdings.market_values.iter().sum();

        self.current_holdings.timestamp = timestamp;
        self.current_holdings.total = self.current_holdings.cash + market_value;

        self.all_positions.push(PositionSnapshot {
            timestamp,
            quantities: self.current_positions.clone(),
        });
        self.all_holdings.push(self.current_holdings.clone());
        Ok(())
    }

    /// Apply the order policy to `signal` without touching any state.
    pub fn generate_order(&self, signal: &SignalEvent) -> Result<Option<OrderEvent>, DataError> {
        let position = self.position(&signal.symbol)?;
        Ok(self
            .policy
            .generate_order(signal, position, self.current_holdings.cash))
    }

    /// Convert a signal into an order and push it. A declined signal pushes
    /// nothing.
    pub fn on_signal(
        &self,
        signal: &SignalEvent,
        sink: &mut dyn EventSink,
    ) -> Result<Option<OrderEvent>, DataError> {
        let order = self.generate_order(signal)?;
        match &order {
            Some(order) => {
                debug!(%order, "Order generated");
                sink.push(order.clone().into());
            }
            None => {
                debug!(
                    symbol = %signal.symbol,
                    kind = %signal.kind,
                    policy = self.policy.name(),
                    "Signal declined"
                );
            }
        }
        Ok(order)
    }

    /// Apply a fill to positions, cash and the commission accumulator.
    pub fn on_fill(&mut self, fill: &FillEvent) -> Result<(), DataError> {
        let index = self.universe.index_of(&fill.symbol)?;

        self.current_positions[index] += fill.side.sign() * fill.quantity as i64;
        self.current_holdings.cash -= fill.signed_notional() + fill.commission;
        self.current_holdings.commission += fill.commission;

        debug!(
            symbol = %fill.symbol,
            side = %fill.side,
            quantity = fill.quantity,
            price = fill.fill_price,
            position = self.current_positions[index],
            cash = self.current_holdings.cash,
            "Fill applied"
        );
        Ok(())
    }
}
