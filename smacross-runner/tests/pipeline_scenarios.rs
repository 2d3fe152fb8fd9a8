//! End-to-end pipeline scenarios against file-backed and synthetic providers.

use chrono::NaiveDate;
use smacross_core::data::{CsvProvider, SyntheticProvider};
use smacross_core::domain::SmaWindows;
use smacross_core::indicators::CrossoverDirection;
use smacross_runner::{
    format_summary, resolve_parameters, run_pipeline, write_indicator_csv, ChartRequest,
    ParameterInputs, RunError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 15 weekdays starting Monday 2024-01-01: five at 10, five at 12, five at 8.
fn write_step_fixture(dir: &std::path::Path) {
    let mut body = String::from("Date,Open,High,Low,Close,Volume\n");
    let closes = [
        10.0, 10.0, 10.0, 10.0, 10.0, 12.0, 12.0, 12.0, 12.0, 12.0, 8.0, 8.0, 8.0, 8.0, 8.0,
    ];
    let weekdays = date(2024, 1, 1).iter_days().filter(|d| {
        !matches!(
            chrono::Datelike::weekday(d),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        )
    });
    for (d, c) in weekdays.zip(closes) {
        body.push_str(&format!("{d},{c},{c},{c},{c},1000\n"));
    }
    std::fs::write(dir.join("STEP.csv"), body).unwrap();
}

fn inputs<'a>(ticker: &'a str, short: &'a str, long: &'a str) -> ParameterInputs<'a> {
    ParameterInputs {
        ticker,
        start: Some(date(2024, 1, 1)),
        end: Some(date(2024, 1, 31)),
        short,
        long,
    }
}

#[test]
fn step_scenario_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    write_step_fixture(dir.path());
    let provider = CsvProvider::new(dir.path());

    let params =
        resolve_parameters(&inputs("step", "2", "5"), date(2024, 2, 1), SmaWindows::default())
            .unwrap();
    let result = run_pipeline(&params, &provider).unwrap();

    assert_eq!(result.ticker(), "STEP");
    assert_eq!(result.len(), 11);
    // Day 5 (index 4) is Friday 2024-01-05.
    assert_eq!(result.rows()[0].date, date(2024, 1, 5));

    let events = result.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].direction, CrossoverDirection::Bullish);
    assert_eq!(events[0].date, date(2024, 1, 8));
    assert_eq!(events[1].direction, CrossoverDirection::Bearish);
    assert_eq!(events[1].date, date(2024, 1, 12));

    let request = ChartRequest::from_indicators(&result);
    assert_eq!(request.buy_points, vec![(date(2024, 1, 8), 12.0)]);
    assert_eq!(request.sell_points, vec![(date(2024, 1, 12), 12.0)]);

    let summary = format_summary(&result);
    assert!(summary.contains("--- Crossovers (2) ---"));

    let out = dir.path().join("step.csv");
    write_indicator_csv(&out, &result).unwrap();
    assert_eq!(std::fs::read_to_string(out).unwrap().lines().count(), 12);
}

#[test]
fn unknown_ticker_is_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let params =
        resolve_parameters(&inputs("ghost", "", ""), date(2024, 2, 1), SmaWindows::default())
            .unwrap();
    let err = run_pipeline(&params, &CsvProvider::new(dir.path())).unwrap_err();
    assert_eq!(err.kind(), "no_data_available");
}

#[test]
fn default_long_window_needs_twenty_bars() {
    let dir = tempfile::tempdir().unwrap();
    write_step_fixture(dir.path());
    let params =
        resolve_parameters(&inputs("STEP", "", ""), date(2024, 2, 1), SmaWindows::default())
            .unwrap();
    let err = run_pipeline(&params, &CsvProvider::new(dir.path())).unwrap_err();
    assert!(matches!(err, RunError::InsufficientData { bars: 15, required: 20 }));
}

#[test]
fn inverted_windows_fail_before_fetch() {
    let err = resolve_parameters(&inputs("SPY", "20", "5"), date(2024, 2, 1), SmaWindows::default())
        .unwrap_err();
    assert!(matches!(err, RunError::InvalidWindowSize(_)));
}

#[test]
fn synthetic_year_produces_events() {
    let params = resolve_parameters(
        &ParameterInputs {
            ticker: "demo",
            start: Some(date(2023, 1, 1)),
            end: Some(date(2023, 12, 31)),
            short: "",
            long: "",
        },
        date(2024, 1, 1),
        SmaWindows::default(),
    )
    .unwrap();
    let result = run_pipeline(&params, &SyntheticProvider::default()).unwrap();
    // 260 weekdays in 2023, minus 19 warmup rows.
    assert_eq!(result.len(), 260 - 19);
    assert!(!result.events().is_empty());
}
