//! Backtest report generation.

use serde::{Deserialize, Serialize};
use std::io::Write;

use eventbt_core::error::TradingError;
use eventbt_core::types::TradeRecord;

use crate::engine::BacktestConfig;
use crate::equity::EquityCurve;
use crate::statistics::BacktestStats;

/// Complete backtest report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Configuration used
    pub config: BacktestConfig,
    /// Strategy name
    pub strategy: String,
    /// Instruments in valuation order
    pub symbols: Vec<String>,
    /// Statistics
    pub stats: BacktestStats,
    /// Signed positions at the end of the run
    pub final_positions: Vec<i64>,
    /// Cash after the last fill
    pub final_cash: f64,
    pub equity_curve: EquityCurve,
    pub trades: Vec<TradeRecord>,
}

fn csv_error(err: csv::Error) -> TradingError {
    TradingError::Serialization(err.to_string())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Strategy:            {}\n", self.strategy));
        s.push_str(&format!("  Instruments:         {}\n", self.symbols.join(", ")));
        s.push_str(&format!(
            "  Start Date:          {}\n",
            self.config.start_date.format("%Y-%m-%d")
        ));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Capital:     ${:.2}\n", stats.initial_capital));
        s.push_str(&format!("  Final Equity:        ${:.2}\n", stats.final_equity));
        s.push_str(&format!("  Total Return:        {:.2}%\n", stats.total_return_pct));
        s.push_str(&format!("  Sharpe Ratio:        {}\n", fmt_opt(stats.sharpe_ratio)));
        s.push_str(&format!("  Max Drawdown:        {:.2}%\n", stats.max_drawdown_pct));
        s.push_str(&format!("  Drawdown Duration:   {}\n", stats.drawdown_duration));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
        s.push_str(&format!("  Closed Trades:       {}\n", stats.closed_trades));
        s.push_str(&format!("  Winning Trades:      {}\n", stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", stats.win_rate_pct));
        s.push_str(&format!("  Realized P&L:        ${:.2}\n", stats.realized_pnl));
        s.push_str(&format!("  Avg Win:             ${:.2}\n", stats.avg_win));
        s.push_str(&format!("  Avg Loss:            ${:.2}\n", stats.avg_loss));
        s.push_str(&format!("  Profit Factor:       {}\n", fmt_opt(stats.profit_factor)));
        s.push_str(&format!("  Commission:          ${:.2}\n", stats.total_commission));
        s.push('\n');

        s.push_str("EXECUTION\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Market Events:       {}\n", stats.counters.market_events));
        s.push_str(&format!("  Signals:             {}\n", stats.counters.signals));
        s.push_str(&format!("  Orders:              {}\n", stats.counters.orders));
        s.push_str(&format!("  Fills:               {}\n", stats.counters.fills));
        s.push_str(&format!("  Equity Points:       {}\n", self.equity_curve.len()));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the equity curve as CSV:
    /// `datetime,cash,commission,<symbols...>,total,returns,equity_curve,drawdown`.
    pub fn write_equity_csv<W: Write>(&self, writer: W) -> Result<(), TradingError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["datetime".to_string(), "cash".into(), "commission".into()];
        header.extend(self.equity_curve.symbols.iter().cloned());
        header.extend(["total", "returns", "equity_curve", "drawdown"].map(String::from));
        wtr.write_record(&header).map_err(csv_error)?;

        for row in &self.equity_curve.rows {
            let mut record = vec![
                row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                row.cash.to_string(),
                row.commission.to_string(),
            ];
            record.extend(row.market_values.iter().map(f64::to_string));
            record.push(row.total.to_string());
            record.push(row.returns.to_string());
            record.push(row.equity_curve.to_string());
            record.push(row.drawdown.to_string());
            wtr.write_record(&record).map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write the trade journal as CSV, one row per trade.
    pub fn write_trades_csv<W: Write>(&self, writer: W) -> Result<(), TradingError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for trade in &self.trades {
            wtr.serialize(TradeRow::from(trade)).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Flat CSV projection of a [`TradeRecord`].
#[derive(Serialize)]
struct TradeRow<'a> {
    datetime: String,
    symbol: &'a str,
    direction: String,
    side: String,
    quantity: u64,
    price: f64,
    commission: f64,
    realized_pnl: Option<f64>,
    realized_pnl_pct: Option<f64>,
}

impl<'a> From<&'a TradeRecord> for TradeRow<'a> {
    fn from(t: &'a TradeRecord) -> Self {
        Self {
            datetime: t.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            symbol: &t.symbol,
            direction: t.direction.to_string(),
            side: t.side.to_string(),
            quantity: t.quantity,
            price: t.price,
            commission: t.commission,
            realized_pnl: t.realized_pnl,
            realized_pnl_pct: t.realized_pnl_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use eventbt_core::types::{Side, SignalKind};
    use eventbt_portfolio::Holdings;

    use crate::engine::DispatchCounters;

    fn report() -> BacktestReport {
        let ts = |d: u32| Utc.with_ymd_and_hms(2015, 5, d, 0, 0, 0).unwrap();
        let holdings = vec![
            Holdings {
                timestamp: ts(1),
                cash: 100_000.0,
                commission: 0.0,
                market_values: vec![0.0],
                total: 100_000.0,
            },
            Holdings {
                timestamp: ts(4),
                cash: -8.0,
                commission: 8.0,
                market_values: vec![110_000.0],
                total: 109_992.0,
            },
        ];
        let symbols = vec!["AAPL".to_string()];
        let equity_curve = EquityCurve::from_holdings(&symbols, &holdings);
        let trades = vec![
            TradeRecord {
                timestamp: ts(2),
                symbol: "AAPL".to_string(),
                direction: SignalKind::Long,
                side: Side::Buy,
                quantity: 1000,
                price: 100.0,
                commission: 8.0,
                realized_pnl: None,
                realized_pnl_pct: None,
            },
            TradeRecord {
                timestamp: ts(4),
                symbol: "AAPL".to_string(),
                direction: SignalKind::Exit,
                side: Side::Sell,
                quantity: 1000,
                price: 110.0,
                commission: 8.0,
                realized_pnl: Some(10_000.0),
                realized_pnl_pct: Some(0.1),
            },
        ];
        let stats = BacktestStats::compute(
            100_000.0,
            &equity_curve,
            &trades,
            DispatchCounters::default(),
            252,
        );

        BacktestReport {
            config: BacktestConfig::default(),
            strategy: "MA Cross".to_string(),
            symbols,
            stats,
            final_positions: vec![0],
            final_cash: 109_984.0,
            equity_curve,
            trades,
        }
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("Total Return"));
        assert!(summary.contains("9.99%"));
        // Two rows give a single return, so no Sharpe ratio
        assert!(summary.contains("Sharpe Ratio:        n/a"));
        assert!(summary.contains("Realized P&L:        $10000.00"));
    }

    #[test]
    fn test_equity_csv() {
        let mut buf = Vec::new();
        report().write_equity_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "datetime,cash,commission,AAPL,total,returns,equity_curve,drawdown"
        );
        assert!(lines[1].starts_with("2015-05-01 00:00:00,100000,0,0,100000,0,1,0"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_trades_csv() {
        let mut buf = Vec::new();
        report().write_trades_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "datetime,symbol,direction,side,quantity,price,commission,realized_pnl,realized_pnl_pct"
        );
        assert_eq!(lines[1], "2015-05-02 00:00:00,AAPL,LONG,BUY,1000,100.0,8.0,,");
        assert_eq!(lines[2], "2015-05-04 00:00:00,AAPL,EXIT,SELL,1000,110.0,8.0,10000.0,0.1");
    }

    #[test]
    fn test_json_roundtrip() {
        let report = report();
        let json = report.to_json().unwrap();
        let parsed: BacktestReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.trades, report.trades);
        assert_eq!(parsed.stats.closed_trades, 1);
    }
}
