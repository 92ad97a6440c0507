//! Backtest statistics.

use serde::{Deserialize, Serialize};
use tracing::warn;

use eventbt_core::types::TradeRecord;

use crate::engine::DispatchCounters;
use crate::equity::EquityCurve;
use crate::performance::sharpe_ratio;

/// Summary statistics for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestStats {
    /// Initial capital
    pub initial_capital: f64,
    /// Ledger total at the last valuation
    pub final_equity: f64,
    /// Total return percentage
    pub total_return_pct: f64,
    /// Sharpe ratio (zero risk-free rate); absent when undefined
    pub sharpe_ratio: Option<f64>,
    /// Maximum drawdown of the equity curve, in percent
    pub max_drawdown_pct: f64,
    /// Longest stretch below a previous high, in periods
    pub drawdown_duration: u64,
    /// Every executed trade
    pub total_trades: usize,
    /// Trades that closed a position
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Winners over closed trades, in percent
    pub win_rate_pct: f64,
    pub realized_pnl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Gross profit over gross loss; absent without losing trades
    pub profit_factor: Option<f64>,
    pub total_commission: f64,
    pub counters: DispatchCounters,
}

impl BacktestStats {
    /// Compute statistics from the equity curve and trade journal.
    pub fn compute(
        initial_capital: f64,
        curve: &EquityCurve,
        trades: &[TradeRecord],
        counters: DispatchCounters,
        periods_per_year: u32,
    ) -> Self {
        let mut stats = Self {
            initial_capital,
            final_equity: curve.final_total().unwrap_or(initial_capital),
            total_return_pct: (curve.final_equity() - 1.0) * 100.0,
            total_trades: trades.len(),
            total_commission: trades.iter().map(|t| t.commission).sum(),
            counters,
            ..Default::default()
        };

        stats.sharpe_ratio = match sharpe_ratio(&curve.returns(), periods_per_year) {
            Ok(sharpe) => Some(sharpe),
            Err(e) => {
                warn!(error = %e, "Sharpe ratio unavailable");
                None
            }
        };

        match curve.drawdowns() {
            Ok(dd) => {
                stats.max_drawdown_pct = dd.max_drawdown * 100.0;
                stats.drawdown_duration = dd.max_duration;
            }
            Err(e) => warn!(error = %e, "Drawdown unavailable"),
        }

        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;

        for pnl in trades.iter().filter_map(|t| t.realized_pnl) {
            stats.closed_trades += 1;
            stats.realized_pnl += pnl;
            if pnl > 0.0 {
                stats.winning_trades += 1;
                gross_profit += pnl;
            } else if pnl < 0.0 {
                stats.losing_trades += 1;
                gross_loss += pnl.abs();
            }
        }

        if stats.closed_trades > 0 {
            stats.win_rate_pct = stats.winning_trades as f64 * 100.0 / stats.closed_trades as f64;
        }
        if stats.winning_trades > 0 {
            stats.avg_win = gross_profit / stats.winning_trades as f64;
        }
        if stats.losing_trades > 0 {
            stats.avg_loss = gross_loss / stats.losing_trades as f64;
        }
        if gross_loss > 0.0 {
            stats.profit_factor = Some(gross_profit / gross_loss);
        }

        stats
    }
}
