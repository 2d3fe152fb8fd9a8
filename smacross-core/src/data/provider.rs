//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV files,
//! synthetic random walks) so the pipeline can swap implementations and tests
//! can mock the network away.

use crate::domain::{PriceSeries, SeriesError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
///
/// The pipeline collapses all of these into a single "no data" failure; the
/// variants exist so the log line says why.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no local data file for '{symbol}' at {path}")]
    MissingFile { symbol: String, path: String },

    #[error("malformed CSV: {0}")]
    Csv(String),

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Yahoo,
    Csv,
    Synthetic,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Yahoo => "yahoo",
            DataSource::Csv => "csv",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// Trait for daily close providers.
///
/// Implementations return a series sorted ascending by date with one bar per
/// trading day in the inclusive range `[start, end]`. An empty series is a valid
/// return value; deciding that "empty" means "no data" is the caller's job.
pub trait DataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<PriceSeries, DataError>;
}
