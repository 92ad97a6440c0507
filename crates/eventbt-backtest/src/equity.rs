//! Equity curve derived from the holdings history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eventbt_core::error::AnalyticsError;
use eventbt_portfolio::Holdings;

use crate::performance::{drawdowns, Drawdowns};

/// One row per holdings snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRow {
    pub timestamp: DateTime<Utc>,
    pub cash: f64,
    pub commission: f64,
    /// Indexed like [`EquityCurve::symbols`]
    pub market_values: Vec<f64>,
    pub total: f64,
    /// Period return of `total`; zero on the first row
    pub returns: f64,
    /// Cumulative growth of one unit; 1.0 on the first row
    pub equity_curve: f64,
    pub drawdown: f64,
}

/// Time-indexed equity history, built once at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    pub symbols: Vec<String>,
    pub rows: Vec<EquityRow>,
}

impl EquityCurve {
    /// Derive returns by percentage change of `total` and the equity column
    /// by cumulative product. A zero previous total yields a zero return.
    pub fn from_holdings(symbols: &[String], holdings: &[Holdings]) -> Self {
        let mut rows = Vec::with_capacity(holdings.len());
        let mut equity = 1.0;
        let mut previous_total: Option<f64> = None;

        for h in holdings {
            let returns = match previous_total {
                Some(prev) if prev != 0.0 => h.total / prev - 1.0,
                _ => 0.0,
            };
            equity *= 1.0 + returns;
            previous_total = Some(h.total);

            rows.push(EquityRow {
                timestamp: h.timestamp,
                cash: h.cash,
                commission: h.commission,
                market_values: h.market_values.clone(),
                total: h.total,
                returns,
                equity_curve: equity,
                drawdown: 0.0,
            });
        }

        let mut curve = Self {
            symbols: symbols.to_vec(),
            rows,
        };
        if let Ok(dd) = curve.drawdowns() {
            for (row, value) in curve.rows.iter_mut().zip(dd.drawdown) {
                row.drawdown = value;
            }
        }
        curve
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Period returns, excluding the first row's placeholder zero.
    pub fn returns(&self) -> Vec<f64> {
        self.rows.iter().skip(1).map(|r| r.returns).collect()
    }

    pub fn equity(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.equity_curve).collect()
    }

    pub fn drawdowns(&self) -> Result<Drawdowns, AnalyticsError> {
        drawdowns(&self.equity())
    }

    pub fn final_total(&self) -> Option<f64> {
        self.rows.last().map(|r| r.total)
    }

    /// Growth of one unit over the whole run.
    pub fn final_equity(&self) -> f64 {
        self.rows.last().map_or(1.0, |r| r.equity_curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn holdings(totals: &[f64]) -> Vec<Holdings> {
        totals
            .iter()
            .enumerate()
            .map(|(i, &total)| Holdings {
                timestamp: Utc.with_ymd_and_hms(2015, 5, 1 + i as u32, 0, 0, 0).unwrap(),
                cash: total,
                commission: 0.0,
                market_values: vec![0.0],
                total,
            })
            .collect()
    }

    #[test]
    fn test_returns_and_equity() {
        let curve = EquityCurve::from_holdings(
            &["AAPL".to_string()],
            &holdings(&[100.0, 120.0, 90.0, 150.0, 110.0]),
        );

        assert_eq!(curve.len(), 5);
        assert_eq!(curve.rows[0].returns, 0.0);
        assert_eq!(curve.rows[0].equity_curve, 1.0);
        assert!((curve.rows[1].returns - 0.2).abs() < 1e-12);
        assert!((curve.rows[2].returns - -0.25).abs() < 1e-12);

        let expected = [1.0, 1.2, 0.9, 1.5, 1.1];
        for (row, e) in curve.rows.iter().zip(expected) {
            assert!((row.equity_curve - e).abs() < 1e-12);
        }
        assert!((curve.rows[4].drawdown - 0.4).abs() < 1e-12);
        assert_eq!(curve.returns().len(), 4);
        assert!((curve.final_equity() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_single_row() {
        let curve = EquityCurve::from_holdings(&["AAPL".to_string()], &holdings(&[100.0]));
        assert_eq!(curve.rows[0].drawdown, 0.0);
        assert!(curve.returns().is_empty());
        assert!(curve.drawdowns().is_err());
    }
}
