//! Criterion benchmarks for the crossover engine.
//!
//! Benchmarks:
//! 1. Plain SMA over a long close series
//! 2. Full compute_crossovers at common window pairs

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use smacross_core::domain::{PriceBar, PriceSeries, SmaWindows};
use smacross_core::indicators::{compute_crossovers, Sma};

fn make_series(n: usize) -> PriceSeries {
    let base_date = NaiveDate::from_ymd_opt(2000, 1, 3).unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar::new(base_date + chrono::Duration::days(i as i64), close)
        })
        .collect();
    PriceSeries::new("BENCH", bars).unwrap()
}

fn bench_sma(c: &mut Criterion) {
    let closes: Vec<f64> = make_series(5_000).closes().collect();
    let mut group = c.benchmark_group("sma");
    for period in [5usize, 20, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(period), &period, |b, &p| {
            let sma = Sma::new(p);
            b.iter(|| sma.compute(black_box(&closes)));
        });
    }
    group.finish();
}

fn bench_crossovers(c: &mut Criterion) {
    let series = make_series(5_000);
    let mut group = c.benchmark_group("compute_crossovers");
    for (short, long) in [(5usize, 20usize), (50, 200)] {
        let windows = SmaWindows::new(short, long).unwrap();
        group.bench_with_input(
            BenchmarkId::new("windows", format!("{short}_{long}")),
            &windows,
            |b, &w| b.iter(|| compute_crossovers(black_box(&series), w)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_sma, bench_crossovers);
criterion_main!(benches);
