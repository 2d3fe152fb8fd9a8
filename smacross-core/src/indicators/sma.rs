//! Simple Moving Average (SMA).
//!
//! Unweighted trailing mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// `period` must be >= 1; `SmaWindows` guarantees this for engine callers.
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            name: format!("sma_{period}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    /// Compute the SMA over the whole close series.
    ///
    /// Each value is the mean of its own window rather than a running sum,
    /// so equal windows produce bit-identical means and ties stay ties.
    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; closes.len()];
        if closes.len() < self.period {
            return result;
        }

        for (offset, window) in closes.windows(self.period).enumerate() {
            result[offset + self.lookback()] = window.iter().sum::<f64>() / self.period as f64;
        }
        result
    }
}
