//! Indicator series export (CSV).

use serde::Serialize;
use smacross_core::indicators::IndicatorSeries;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow {
    date: String,
    close: f64,
    sma_short: f64,
    sma_long: f64,
    bullish: u8,
    /// Empty on the first retained row.
    crossover: Option<i8>,
}

/// Write one row per retained day: `date,close,sma_short,sma_long,bullish,crossover`.
pub fn write_indicator_csv(path: &Path, series: &IndicatorSeries) -> Result<(), ExportError> {
    let file = std::fs::File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    write_rows(file, series)
}

fn write_rows<W: Write>(out: W, series: &IndicatorSeries) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    for row in series.rows() {
        writer.serialize(CsvRow {
            date: row.date.to_string(),
            close: row.close,
            sma_short: row.sma_short,
            sma_long: row.sma_long,
            bullish: u8::from(row.bullish),
            crossover: row.delta,
        })?;
    }
    writer.flush()?;
    Ok(())
}
