//! Performance analytics over an equity series.
//!
//! Pure functions with no state. Degenerate inputs are reported as
//! [`AnalyticsError::DegenerateStatistics`] rather than NaN.

use serde::{Deserialize, Serialize};

use eventbt_core::error::AnalyticsError;

/// Trading days per year.
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;

/// Annualised Sharpe ratio with a zero risk-free rate:
/// `sqrt(periods) * mean(returns) / std(returns)`, population deviation.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: u32) -> Result<f64, AnalyticsError> {
    if returns.len() < 2 {
        return Err(AnalyticsError::degenerate(format!(
            "Sharpe ratio needs at least 2 returns, got {}",
            returns.len()
        )));
    }
    if periods_per_year == 0 {
        return Err(AnalyticsError::degenerate("periods per year must be positive"));
    }
    if returns.iter().any(|r| !r.is_finite()) {
        return Err(AnalyticsError::degenerate("return series contains non-finite values"));
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return Err(AnalyticsError::degenerate("return series has zero variance"));
    }

    Ok((periods_per_year as f64).sqrt() * mean / std_dev)
}

/// Drawdown series for an equity curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawdowns {
    pub high_water_marks: Vec<f64>,
    /// `hwm[t] - equity[t]`
    pub drawdown: Vec<f64>,
    /// Consecutive periods spent below the high-water mark
    pub duration: Vec<u64>,
    pub max_drawdown: f64,
    pub max_duration: u64,
}

/// Running high-water mark, drawdown and drawdown duration.
///
/// `hwm[0] = equity[0]`; each new high resets the duration to zero.
pub fn drawdowns(equity: &[f64]) -> Result<Drawdowns, AnalyticsError> {
    if equity.len() < 2 {
        return Err(AnalyticsError::degenerate(format!(
            "drawdown needs at least 2 points, got {}",
            equity.len()
        )));
    }
    if equity.iter().any(|e| !e.is_finite()) {
        return Err(AnalyticsError::degenerate("equity series contains non-finite values"));
    }

    let n = equity.len();
    let mut high_water_marks = Vec::with_capacity(n);
    let mut drawdown = Vec::with_capacity(n);
    let mut duration = Vec::with_capacity(n);

    let mut hwm = equity[0];
    let mut run = 0u64;
    for &value in equity {
        hwm = hwm.max(value);
        let dd = hwm - value;
        run = if dd == 0.0 { 0 } else { run + 1 };
        high_water_marks.push(hwm);
        drawdown.push(dd);
        duration.push(run);
    }

    let max_drawdown = drawdown.iter().copied().fold(0.0, f64::max);
    let max_duration = duration.iter().copied().max().unwrap_or(0);

    Ok(Drawdowns {
        high_water_marks,
        drawdown,
        duration,
        max_drawdown,
        max_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn test_drawdown_sequence() {
        let dd = drawdowns(&[1.0, 1.2, 0.9, 1.5, 1.1]).unwrap();

        assert!(approx(&dd.high_water_marks, &[1.0, 1.2, 1.2, 1.5, 1.5]));
        assert!(approx(&dd.drawdown, &[0.0, 0.0, 0.3, 0.0, 0.4]));
        assert_eq!(dd.duration, vec![0, 0, 1, 0, 1]);
        assert!((dd.max_drawdown - 0.4).abs() < 1e-12);
        assert_eq!(dd.max_duration, 1);
    }

    #[test]
    fn test_drawdown_duration_accumulates() {
        let dd = drawdowns(&[1.0, 0.9, 0.8, 0.95, 1.0, 0.5]).unwrap();
        assert_eq!(dd.duration, vec![0, 1, 2, 3, 0, 1]);
        assert_eq!(dd.max_duration, 3);
        assert!((dd.max_drawdown - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_drawdown_degenerate() {
        assert!(matches!(
            drawdowns(&[]),
            Err(AnalyticsError::DegenerateStatistics { .. })
        ));
        assert!(drawdowns(&[1.0]).is_err());
        assert!(drawdowns(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_sharpe_ratio() {
        let returns = [0.01, -0.005, 0.02, 0.0];
        let mean = returns.iter().sum::<f64>() / 4.0;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 4.0;
        let expected = 252f64.sqrt() * mean / var.sqrt();

        let sharpe = sharpe_ratio(&returns, 252).unwrap();
        assert!((sharpe - expected).abs() < 1e-12);

        // Periods scale with the square root
        let hourly = sharpe_ratio(&returns, 252 * 4).unwrap();
        assert!((hourly - 2.0 * sharpe).abs() < 1e-9);
    }

    #[test]
    fn test_sharpe_degenerate() {
        assert!(sharpe_ratio(&[], 252).is_err());
        assert!(sharpe_ratio(&[0.01], 252).is_err());
        assert_eq!(
            sharpe_ratio(&[0.25, 0.25, 0.25], 252),
            Err(AnalyticsError::degenerate("return series has zero variance"))
        );
        assert!(sharpe_ratio(&[0.01, 0.02], 0).is_err());
    }
}
