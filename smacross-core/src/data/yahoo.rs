//! Yahoo Finance data provider.
//!
//! Fetches daily bars from Yahoo's v8 chart API and keeps the close column.
//! Handles rate limiting, retries with exponential backoff, and response parsing.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.
//! The CSV provider is the fallback when Yahoo is unavailable.

use super::provider::{DataError, DataProvider};
use crate::domain::{PriceBar, PriceSeries};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Exchange metadata. Timestamps are UTC; `gmtoffset` shifts them to exchange local time.
#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

/// Network behaviour for [`YahooProvider`].
#[derive(Debug, Clone)]
pub struct YahooSettings {
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for YahooSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Yahoo Finance data provider.
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    settings: YahooSettings,
}

impl YahooProvider {
    pub fn new(settings: YahooSettings) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, settings })
    }

    /// Build the chart API URL for a symbol and an inclusive date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive upstream; ask for the start of the following day.
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp();
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d&events=history"
        )
    }

    /// Parse the chart API response into closes within `[start, end]`.
    fn parse_response(
        symbol: &str,
        resp: ChartResponse,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let offset = data.meta.gmtoffset;

        // No timestamps means no trading days in range.
        let Some(timestamps) = data.timestamp else {
            return Ok(PriceSeries::new(symbol, Vec::new())?);
        };

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            // Bars are dated in the exchange's own calendar.
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            // Null close: holiday placeholder or a halted session.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };

            if date < start || date > end {
                continue;
            }
            bars.push(PriceBar::new(date, close));
        }

        Ok(PriceSeries::from_unsorted(symbol, bars)?)
    }

    /// Wait before retry `attempt` (1-based): exponential backoff, or the
    /// server's `Retry-After` when that is longer.
    fn retry_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.settings.base_delay * 2u32.pow(attempt.saturating_sub(1));
        retry_after.map_or(backoff, |wait| wait.max(backoff))
    }

    /// Execute the request, retrying transient failures with exponential backoff.
    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;
        let mut retry_after = None;

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay(attempt, retry_after.take());
                warn!(
                    symbol,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %last_error.as_ref().map(ToString::to_string).unwrap_or_default(),
                    "retrying yahoo request"
                );
                std::thread::sleep(delay);
            }

            debug!(%url, attempt, "requesting chart data");
            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let header_secs = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                retry_after = header_secs.map(Duration::from_secs);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: header_secs.unwrap_or(0),
                });
                continue;
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if status.is_server_error() {
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            if !status.is_success() {
                return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
            }

            let body = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
            let chart: ChartResponse = serde_json::from_str(&body).map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse response for {symbol}: {e}"
                ))
            })?;

            return Self::parse_response(symbol, chart, start, end);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataError> {
        self.fetch_with_retry(ticker, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(json: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("SPY", resp, start, end)
    }

    // 2024-01-02, 2024-01-03, 2024-01-04 at 14:30 UTC (US market open).
    const THREE_DAYS: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704205800, 1704292200, 1704378600],
                "indicators": {
                    "quote": [{
                        "open": [470.0, 471.0, 468.0],
                        "close": [472.65, null, 467.28],
                        "volume": [100, 200, 300]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn chart_url_covers_inclusive_range() {
        let url = YahooProvider::chart_url("SPY", date(2024, 1, 2), date(2024, 1, 4));
        assert!(url.starts_with("https://query2.finance.yahoo.com/v8/finance/chart/SPY?"));
        // 2024-01-02T00:00:00Z
        assert!(url.contains("period1=1704153600"));
        // 2024-01-05T00:00:00Z
        assert!(url.contains("period2=1704412800"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn parses_closes_and_skips_nulls() {
        let series = parse(THREE_DAYS, date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(series.ticker(), "SPY");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0], PriceBar::new(date(2024, 1, 2), 472.65));
        assert_eq!(series.bars()[1], PriceBar::new(date(2024, 1, 4), 467.28));
    }

    #[test]
    fn trims_bars_outside_requested_range() {
        let series = parse(THREE_DAYS, date(2024, 1, 3), date(2024, 1, 3)).unwrap();
        assert!(series.is_empty());
        let series = parse(THREE_DAYS, date(2024, 1, 4), date(2024, 1, 10)).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn missing_timestamps_is_an_empty_series() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{"close":[]}]}}],"error":null}}"#;
        let series = parse(json, date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        assert!(series.is_empty());
    }

    // BHP.AX on 2024-01-02: the 10:00 AEDT open is 23:00 UTC the day before.
    const ASX_OPEN: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "BHP.AX", "gmtoffset": 39600 },
                "timestamp": [1704150000],
                "indicators": { "quote": [{ "close": [49.64] }] }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn bars_are_dated_in_exchange_time() {
        let series = parse(ASX_OPEN, date(2024, 1, 2), date(2024, 1, 2)).unwrap();
        assert_eq!(series.bars(), &[PriceBar::new(date(2024, 1, 2), 49.64)]);

        let series = parse(ASX_OPEN, date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn retry_delay_backs_off_exponentially() {
        let provider = YahooProvider::new(YahooSettings::default()).unwrap();
        assert_eq!(provider.retry_delay(1, None), Duration::from_millis(500));
        assert_eq!(provider.retry_delay(2, None), Duration::from_secs(1));
        assert_eq!(provider.retry_delay(3, None), Duration::from_secs(2));
    }

    #[test]
    fn retry_delay_honours_longer_retry_after() {
        let provider = YahooProvider::new(YahooSettings::default()).unwrap();
        let wait = Some(Duration::from_secs(5));
        assert_eq!(provider.retry_delay(1, wait), Duration::from_secs(5));
        // A shorter Retry-After never undercuts the backoff.
        let short = Some(Duration::from_millis(100));
        assert_eq!(provider.retry_delay(2, short), Duration::from_secs(1));
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }"#;
        let err = parse(json, date(2024, 1, 1), date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "SPY"));
    }

    #[test]
    fn other_api_errors_are_format_changes() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid input" }
            }
        }"#;
        let err = parse(json, date(2024, 1, 1), date(2024, 1, 2)).unwrap_err();
        assert!(
            matches!(err, DataError::ResponseFormatChanged(msg) if msg.contains("Bad Request"))
        );
    }

    #[test]
    fn empty_result_array_is_a_format_change() {
        let json = r#"{"chart":{"result":[],"error":null}}"#;
        let err = parse(json, date(2024, 1, 1), date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn default_settings() {
        let s = YahooSettings::default();
        assert_eq!(s.timeout, Duration::from_secs(30));
        assert_eq!(s.max_retries, 3);
    }
}
