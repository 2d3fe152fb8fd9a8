//! Fetch → compute pipeline and the single error type that leaves it.
//!
//! Each stage returns its own typed error; this module is where they are
//! collapsed into `RunError`, the one failure path the binary reports.

use crate::chart::ChartError;
use crate::export::ExportError;
use chrono::NaiveDate;
use smacross_core::data::DataProvider;
use smacross_core::domain::{parse_window, RunParameters, SmaWindows, Ticker, ValidationError};
use smacross_core::indicators::{compute_crossovers, IndicatorError, IndicatorSeries};
use thiserror::Error;
use tracing::{debug, info};

/// Everything that can end a run.
#[derive(Debug, Error)]
pub enum RunError {
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

    #[error("no data fetched for {ticker} ({reason}); check the ticker symbol and date range")]
    NoDataAvailable { ticker: String, reason: String },

    #[error("not enough data points to calculate the long SMA: {bars} bars, need {required}")]
    InsufficientData { bars: usize, required: usize },

    #[error("chart rendering failed: {0}")]
    Render(#[from] ChartError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RunError {
    /// Stable snake_case name for structured logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::EmptyTicker => "empty_ticker",
            RunError::InvalidDateFormat { .. } => "invalid_date_format",
            RunError::MissingStartDate => "missing_start_date",
            RunError::InvalidDateOrder { .. } => "invalid_date_order",
            RunError::InvalidWindowSize(_) => "invalid_window_size",
            RunError::NoDataAvailable { .. } => "no_data_available",
            RunError::InsufficientData { .. } => "insufficient_data",
            RunError::Render(_) => "render",
            RunError::Export(_) => "export",
            RunError::Io(_) => "io",
        }
    }

    /// True for bad input and missing data; false for collaborator failures.
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            RunError::Render(_) | RunError::Export(_) | RunError::Io(_)
        )
    }
}

impl From<ValidationError> for RunError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyTicker => RunError::EmptyTicker,
            ValidationError::InvalidDateFormat { input } => RunError::InvalidDateFormat { input },
            ValidationError::MissingStartDate => RunError::MissingStartDate,
            ValidationError::InvalidDateOrder { start, end } => {
                RunError::InvalidDateOrder { start, end }
            }
            ValidationError::InvalidWindowSize(msg) => RunError::InvalidWindowSize(msg),
        }
    }
}

impl From<IndicatorError> for RunError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { bars, required } => {
                RunError::InsufficientData { bars, required }
            }
        }
    }
}

/// Raw answers gathered from flags or prompts, before validation.
#[derive(Debug, Clone, Default)]
pub struct ParameterInputs<'a> {
    pub ticker: &'a str,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub short: &'a str,
    pub long: &'a str,
}

/// Validate raw inputs in prompt order: ticker, start date, date order, windows.
///
/// A missing end date defaults to `today`; blank windows take `defaults`.
pub fn resolve_parameters(
    inputs: &ParameterInputs<'_>,
    today: NaiveDate,
    defaults: SmaWindows,
) -> Result<RunParameters, RunError> {
    let ticker = Ticker::parse(inputs.ticker)?;
    let start = inputs.start.ok_or(RunError::MissingStartDate)?;
    let end = inputs.end.unwrap_or(today);
    if start >= end {
        return Err(RunError::InvalidDateOrder { start, end });
    }
    let windows = SmaWindows::new(
        parse_window(inputs.short, defaults.short())?,
        parse_window(inputs.long, defaults.long())?,
    )?;
    Ok(RunParameters::new(ticker, start, end, windows)?)
}

/// Fetch the series and compute crossovers.
///
/// Any provider failure, and an empty series, become `NoDataAvailable`.
pub fn run_pipeline(
    params: &RunParameters,
    provider: &dyn DataProvider,
) -> Result<IndicatorSeries, RunError> {
    let ticker = params.ticker.as_str();
    info!(
        ticker,
        provider = provider.name(),
        "downloading data for {ticker} from {} to {}",
        params.start,
        params.end
    );

    let series = provider
        .fetch(ticker, params.start, params.end)
        .map_err(|e| RunError::NoDataAvailable {
            ticker: ticker.to_string(),
            reason: e.to_string(),
        })?;

    if series.is_empty() {
        return Err(RunError::NoDataAvailable {
            ticker: ticker.to_string(),
            reason: "provider returned no bars".into(),
        });
    }
    debug!(bars = series.len(), "fetched price series");

    let indicators = compute_crossovers(&series, params.windows)?;
    info!(
        rows = indicators.len(),
        events = indicators.events().len(),
        "computed SMA crossovers"
    );
    Ok(indicators)
}
