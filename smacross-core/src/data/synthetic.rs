//! Deterministic random-walk closes for demos and offline runs.
//!
//! The RNG is seeded from the BLAKE3 hash of the ticker, so the same ticker
//! and range always produce the same series. Weekends are skipped.

use super::provider::{DataError, DataProvider};
use crate::domain::{PriceBar, PriceSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    start_price: f64,
    max_daily_move: f64,
}

impl SyntheticProvider {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        Self {
            start_price,
            max_daily_move,
        }
    }
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self::new(100.0, 0.03)
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;

        for current in start.iter_days().take_while(|d| *d <= end) {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let daily_return: f64 = rng.gen_range(-self.max_daily_move..=self.max_daily_move);
            price = (price * (1.0 + daily_return)).max(0.01);
            bars.push(PriceBar::new(current, price));
        }

        Ok(PriceSeries::new(ticker, bars)?)
    }
}
