//! Terminal report printed after a successful run.

use smacross_core::indicators::IndicatorSeries;
use std::fmt::Write;

pub fn format_summary(series: &IndicatorSeries) -> String {
    let mut out = String::new();
    let windows = series.windows();
    let events = series.events();

    // Writing to a String cannot fail.
    let _ = writeln!(out);
    let _ = writeln!(out, "=== {} SMA Crossover ===", series.ticker());
    let _ = writeln!(
        out,
        "Windows:        short {} / long {}",
        windows.short(),
        windows.long()
    );
    if let (Some(first), Some(last)) = (series.rows().first(), series.latest()) {
        let _ = writeln!(out, "Period:         {} to {}", first.date, last.date);
        let _ = writeln!(out, "Rows:           {}", series.len());
        let _ = writeln!(out, "Last close:     {:.2}", last.close);
        let _ = writeln!(out, "SMA short:      {:.2}", last.sma_short);
        let _ = writeln!(out, "SMA long:       {:.2}", last.sma_long);
        let regime = if series.is_bullish() { "bullish" } else { "bearish" };
        let _ = writeln!(out, "Regime:         {regime}");
    }
    let _ = writeln!(out);

    if events.is_empty() {
        let _ = writeln!(out, "No crossovers in range.");
        return out;
    }

    let _ = writeln!(out, "--- Crossovers ({}) ---", events.len());
    let _ = writeln!(out, "{:<12} {:<6} {:>12}", "Date", "Signal", "Close");
    let _ = writeln!(out, "{}", "-".repeat(32));
    for event in &events {
        let _ = writeln!(
            out,
            "{:<12} {:<6} {:>12.2}",
            event.date.to_string(),
            event.direction.label(),
            event.close
        );
    }
    out
}
