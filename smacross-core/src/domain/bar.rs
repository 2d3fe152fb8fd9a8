//! PriceBar and PriceSeries: the market data a run operates on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closing price for a single trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("bars out of order: {next} does not follow {previous}")]
    Unordered {
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("invalid close {close} on {date}")]
    InvalidClose { date: NaiveDate, close: f64 },
}

/// Daily closes for one ticker, strictly ascending by date.
///
/// Construction enforces the ordering invariant, so consumers never re-check it.
/// Weekends and holidays are simply absent; there is no gap filling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for bar in &bars {
            if !bar.close.is_finite() || bar.close < 0.0 {
                return Err(SeriesError::InvalidClose {
                    date: bar.date,
                    close: bar.close,
                });
            }
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::Unordered {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            ticker: ticker.into(),
            bars,
        })
    }

    /// Sort by date and keep the first bar for each date before validating.
    ///
    /// Providers use this to normalise whatever order the source returned.
    pub fn from_unsorted(
        ticker: impl Into<String>,
        mut bars: Vec<PriceBar>,
    ) -> Result<Self, SeriesError> {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self::new(ticker, bars)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

/// Build a series of consecutive calendar days from close prices for testing.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> PriceSeries {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(base_date + chrono::Duration::days(i as i64), close))
        .collect();
    PriceSeries::new("TEST", bars).unwrap()
}
