//! Offline provider reading `{data_dir}/{TICKER}.csv`.
//!
//! The file needs a header row with `Date` and `Close` columns (any case, any
//! position). Other columns such as Open/High/Low/Volume are ignored, so a
//! Yahoo "download CSV" export works unchanged.

use super::provider::{DataError, DataProvider};
use crate::dates::DATE_FORMAT;
use crate::domain::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CsvProvider {
    data_dir: PathBuf,
}

impl CsvProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.data_dir.join(format!("{ticker}.csv"))
    }

    fn read_bars(
        path: &Path,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::Csv(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| DataError::Csv(e.to_string()))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| DataError::Csv(format!("missing '{name}' column")))
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut bars = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DataError::Csv(e.to_string()))?;
            // +2: one for the header, one for 1-based line numbers.
            let row = line + 2;

            let raw_date = record.get(date_col).unwrap_or_default();
            let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
                .map_err(|_| DataError::Csv(format!("row {row}: bad date '{raw_date}'")))?;
            if date < start || date > end {
                continue;
            }

            let raw_close = record.get(close_col).unwrap_or_default();
            if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
                continue;
            }
            let close = raw_close
                .parse::<f64>()
                .map_err(|_| DataError::Csv(format!("row {row}: bad close '{raw_close}'")))?;

            bars.push(PriceBar::new(date, close));
        }
        Ok(bars)
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(DataError::MissingFile {
                symbol: ticker.to_string(),
                path: path.display().to_string(),
            });
        }
        let bars = Self::read_bars(&path, start, end)?;
        Ok(PriceSeries::from_unsorted(ticker, bars)?)
    }
}
