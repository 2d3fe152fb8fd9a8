//! Moving average crossover engine: golden cross and death cross detection.
//!
//! Computes a short and a long SMA over the close series, keeps only the rows
//! where the long SMA is defined, classifies each row as bullish (short SMA
//! strictly above long SMA) or not, and marks the rows where that regime flips.
//!
//! Equal SMAs are classified non-bullish. A tie after a bullish stretch is
//! therefore a Bearish event.

use super::sma::Sma;
use crate::domain::{PriceBar, PriceSeries, SmaWindows};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("not enough data points to calculate the long SMA: {bars} bars, need {required}")]
    InsufficientData { bars: usize, required: usize },
}

/// Which way the short SMA crossed the long SMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrossoverDirection {
    /// Short SMA moved above the long SMA (buy).
    Bullish,
    /// Short SMA moved to or below the long SMA (sell).
    Bearish,
}

impl CrossoverDirection {
    pub fn label(&self) -> &'static str {
        match self {
            CrossoverDirection::Bullish => "Buy",
            CrossoverDirection::Bearish => "Sell",
        }
    }
}

/// A day on which the bullish flag changed relative to the previous retained row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrossoverEvent {
    pub date: NaiveDate,
    pub close: f64,
    pub direction: CrossoverDirection,
}

/// One retained day of the indicator computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: f64,
    pub sma_long: f64,
    pub bullish: bool,
    /// `bullish[i] - bullish[i-1]`; `None` on the first retained row.
    pub delta: Option<i8>,
}

impl IndicatorRow {
    pub fn event(&self) -> Option<CrossoverDirection> {
        match self.delta {
            Some(1) => Some(CrossoverDirection::Bullish),
            Some(-1) => Some(CrossoverDirection::Bearish),
            _ => None,
        }
    }
}

/// The retained suffix of the rolling computation, starting at index `long - 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    ticker: String,
    windows: SmaWindows,
    rows: Vec<IndicatorRow>,
}

impl IndicatorSeries {
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn windows(&self) -> SmaWindows {
        self.windows
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Regime on the most recent retained day.
    pub fn is_bullish(&self) -> bool {
        self.latest().is_some_and(|r| r.bullish)
    }

    pub fn events(&self) -> Vec<CrossoverEvent> {
        self.rows
            .iter()
            .filter_map(|row| {
                row.event().map(|direction| CrossoverEvent {
                    date: row.date,
                    close: row.close,
                    direction,
                })
            })
            .collect()
    }

    /// (date, close) at every Bullish event.
    pub fn buy_points(&self) -> Vec<(NaiveDate, f64)> {
        self.points(CrossoverDirection::Bullish)
    }

    /// (date, close) at every Bearish event.
    pub fn sell_points(&self) -> Vec<(NaiveDate, f64)> {
        self.points(CrossoverDirection::Bearish)
    }

    fn points(&self, direction: CrossoverDirection) -> Vec<(NaiveDate, f64)> {
        self.rows
            .iter()
            .filter(|row| row.event() == Some(direction))
            .map(|row| (row.date, row.close))
            .collect()
    }
}

/// Compute both SMAs, trim the warmup, and derive crossover deltas.
///
/// Fails with `InsufficientData` when the series is shorter than the long window.
/// On success the result has exactly `len(series) - long + 1` rows.
pub fn compute_crossovers(
    series: &PriceSeries,
    windows: SmaWindows,
) -> Result<IndicatorSeries, IndicatorError> {
    let bars = series.bars();
    if bars.len() < windows.long() {
        return Err(IndicatorError::InsufficientData {
            bars: bars.len(),
            required: windows.long(),
        });
    }

    let closes: Vec<f64> = series.closes().collect();
    let short = Sma::new(windows.short()).compute(&closes);
    let long = Sma::new(windows.long()).compute(&closes);

    let first = windows.long() - 1;
    let mut rows = Vec::with_capacity(bars.len() - first);
    let mut prev_flag: Option<bool> = None;

    for (i, PriceBar { date, close }) in bars.iter().enumerate().skip(first) {
        let bullish = short[i] > long[i];
        let delta = prev_flag.map(|prev| i8::from(bullish) - i8::from(prev));
        rows.push(IndicatorRow {
            date: *date,
            close: *close,
            sma_short: short[i],
            sma_long: long[i],
            bullish,
            delta,
        });
        prev_flag = Some(bullish);
    }

    Ok(IndicatorSeries {
        ticker: series.ticker().to_string(),
        windows,
        rows,
    })
}
