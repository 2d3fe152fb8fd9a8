//! Run parameters and the validation rules applied at the shell boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 20;

/// Validation failures for user-supplied run parameters.
///
/// All of these are raised before any data is fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker symbol cannot be empty")]
    EmptyTicker,

    #[error("incorrect date format '{input}', expected YYYY-MM-DD")]
    InvalidDateFormat { input: String },

    #[error("start date is required")]
    MissingStartDate,

    #[error("start date {start} must be earlier than end date {end}")]
    InvalidDateOrder { start: NaiveDate, end: NaiveDate },

    #[error("invalid window size: {0}")]
    InvalidWindowSize(String),
}

/// Upper-cased, trimmed, non-empty ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated (short, long) pair: `0 < short < long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmaWindows {
    short: usize,
    long: usize,
}

impl SmaWindows {
    pub fn new(short: usize, long: usize) -> Result<Self, ValidationError> {
        if short == 0 || long == 0 {
            return Err(ValidationError::InvalidWindowSize(format!(
                "windows must be positive integers (got short={short}, long={long})"
            )));
        }
        if short >= long {
            return Err(ValidationError::InvalidWindowSize(format!(
                "short window ({short}) must be less than long window ({long})"
            )));
        }
        Ok(Self { short, long })
    }

    pub fn short(&self) -> usize {
        self.short
    }

    pub fn long(&self) -> usize {
        self.long
    }
}

impl Default for SmaWindows {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT_WINDOW,
            long: DEFAULT_LONG_WINDOW,
        }
    }
}

/// Parse a window-size answer. Blank input yields `default`.
pub fn parse_window(input: &str, default: usize) -> Result<usize, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    match trimmed.parse::<usize>() {
        Ok(0) | Err(_) => Err(ValidationError::InvalidWindowSize(format!(
            "'{trimmed}' is not a positive integer"
        ))),
        Ok(n) => Ok(n),
    }
}

/// Everything a run needs, validated once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    pub ticker: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub windows: SmaWindows,
}

impl RunParameters {
    pub fn new(
        ticker: Ticker,
        start: NaiveDate,
        end: NaiveDate,
        windows: SmaWindows,
    ) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidDateOrder { start, end });
        }
        Ok(Self {
            ticker,
            start,
            end,
            windows,
        })
    }
}
