//! Indicator trait definitions.

/// Batch indicator over a price window.
///
/// Strategies feed the indicator the values returned by a bar feed
/// lookback, oldest first.
pub trait Indicator {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data, oldest first.
    fn calculate(&self, data: &[f64]) -> Vec<Self::Output>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Most recent value, or `None` while the window is not filled.
    fn latest(&self, data: &[f64]) -> Option<Self::Output> {
        self.calculate(data).pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WindowSum {
        period: usize,
    }

    impl Indicator for WindowSum {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<f64> {
            if data.len() < self.period {
                return vec![];
            }
            data.windows(self.period).map(|w| w.iter().sum()).collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "window_sum"
        }
    }

    #[test]
    fn test_latest() {
        let indicator = WindowSum { period: 3 };
        assert_eq!(indicator.latest(&[1.0, 2.0]), None);
        assert_eq!(indicator.latest(&[1.0, 2.0, 3.0, 4.0]), Some(9.0));
    }
}
