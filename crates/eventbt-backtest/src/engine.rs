//! Event-driven backtesting engine.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use eventbt_core::error::TradingError;
use eventbt_core::queue::EventQueue;
use eventbt_core::traits::{BarFeed, ExecutionHandler, Strategy};
use eventbt_core::types::Event;
use eventbt_portfolio::{AllInPolicy, OrderPolicy, Portfolio};

use crate::equity::EquityCurve;
use crate::performance::DEFAULT_PERIODS_PER_YEAR;
use crate::report::BacktestReport;
use crate::statistics::BacktestStats;

/// Backtest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Initial capital
    pub initial_capital: f64,
    /// Timestamp of the first ledger snapshot
    pub start_date: DateTime<Utc>,
    /// Pause between feed steps, in milliseconds
    pub heartbeat_ms: u64,
    /// Annualisation factor for the Sharpe ratio
    pub periods_per_year: u32,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            start_date: Utc
                .with_ymd_and_hms(2015, 5, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            heartbeat_ms: 0,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

/// Number of events dispatched, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCounters {
    pub market_events: u64,
    pub signals: u64,
    pub orders: u64,
    pub fills: u64,
}

/// Backtesting engine.
///
/// Owns the event queue and is its only reader. Each feed step is drained
/// completely before the next one:
///
/// - Market: strategy, then portfolio valuation
/// - Signal: portfolio order generation
/// - Order: execution
/// - Fill: ledger update
///
/// The run ends once the feed is exhausted and the queue is empty.
pub struct Backtest<F, S, E, P = AllInPolicy>
where
    F: BarFeed,
    S: Strategy,
    E: ExecutionHandler,
    P: OrderPolicy,
{
    config: BacktestConfig,
    feed: F,
    strategy: S,
    portfolio: Portfolio<P>,
    execution: E,
    queue: EventQueue,
    counters: DispatchCounters,
}

impl<F, S, E> Backtest<F, S, E, AllInPolicy>
where
    F: BarFeed,
    S: Strategy,
    E: ExecutionHandler,
{
    /// Create a backtest with all-in order sizing.
    pub fn new(config: BacktestConfig, feed: F, strategy: S, execution: E) -> Self {
        Self::with_policy(config, feed, strategy, execution, AllInPolicy)
    }
}

impl<F, S, E, P> Backtest<F, S, E, P>
where
    F: BarFeed,
    S: Strategy,
    E: ExecutionHandler,
    P: OrderPolicy,
{
    pub fn with_policy(
        config: BacktestConfig,
        feed: F,
        strategy: S,
        execution: E,
        policy: P,
    ) -> Self {
        let portfolio = Portfolio::with_policy(
            feed.universe().clone(),
            policy,
            config.start_date,
            config.initial_capital,
        );
        Self {
            config,
            feed,
            strategy,
            portfolio,
            execution,
            queue: EventQueue::new(),
            counters: DispatchCounters::default(),
        }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn portfolio(&self) -> &Portfolio<P> {
        &self.portfolio
    }

    pub fn execution(&self) -> &E {
        &self.execution
    }

    pub fn counters(&self) -> DispatchCounters {
        self.counters
    }

    /// Drive the simulation until the feed is exhausted and the queue is
    /// drained, then build the report.
    pub fn run(&mut self) -> Result<BacktestReport, TradingError> {
        let started = Instant::now();
        info!(
            strategy = self.strategy.name(),
            execution = self.execution.name(),
            instruments = self.feed.universe().len(),
            initial_capital = self.config.initial_capital,
            "Starting backtest"
        );

        let heartbeat = Duration::from_millis(self.config.heartbeat_ms);
        while self.feed.has_more() {
            self.feed.advance(&mut self.queue)?;
            self.drain()?;
            if !heartbeat.is_zero() {
                std::thread::sleep(heartbeat);
            }
        }
        self.drain()?;

        info!(
            market_events = self.counters.market_events,
            signals = self.counters.signals,
            orders = self.counters.orders,
            fills = self.counters.fills,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Backtest finished"
        );

        Ok(self.report())
    }

    fn drain(&mut self) -> Result<(), TradingError> {
        while let Some(event) = self.queue.pop() {
            self.dispatch(event)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: Event) -> Result<(), TradingError> {
        debug!(kind = %event.kind(), "Dispatch");
        match event {
            Event::Market(market) => {
                self.counters.market_events += 1;
                // Signals are queued before valuation so orders see the
                // position as it stood at this bar
                self.strategy
                    .calculate_signals(&market, &self.feed, &mut self.queue)?;
                self.portfolio.mark_to_market(&self.feed)?;
            }
            Event::Signal(signal) => {
                self.counters.signals += 1;
                self.portfolio.on_signal(&signal, &mut self.queue)?;
            }
            Event::Order(order) => {
                self.counters.orders += 1;
                self.execution.execute_order(&order, &mut self.queue)?;
            }
            Event::Fill(fill) => {
                self.counters.fills += 1;
                self.portfolio.on_fill(&fill)?;
            }
        }
        Ok(())
    }

    /// Build the report from the current ledgers and journal.
    pub fn report(&self) -> BacktestReport {
        let symbols = self.portfolio.universe().symbols();
        let equity_curve = EquityCurve::from_holdings(symbols, self.portfolio.all_holdings());
        let trades = self.execution.trades().to_vec();
        let stats = BacktestStats::compute(
            self.portfolio.initial_capital(),
            &equity_curve,
            &trades,
            self.counters,
            self.config.periods_per_year,
        );

        BacktestReport {
            config: self.config.clone(),
            strategy: self.strategy.name().to_string(),
            symbols: symbols.to_vec(),
            stats,
            final_positions: self.portfolio.current_positions().to_vec(),
            final_cash: self.portfolio.current_holdings().cash,
            equity_curve,
            trades,
        }
    }
}
