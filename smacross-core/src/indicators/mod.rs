//! Moving averages and the crossover engine built on them.
//!
//! Indicators are pure functions: close history in, numeric series out.
//! Warmup positions are `f64::NAN`, so every output has the input's length.

pub mod crossover;
pub mod sma;

pub use crossover::{
    compute_crossovers, CrossoverDirection, CrossoverEvent, IndicatorError, IndicatorRow,
    IndicatorSeries,
};
pub use sma::Sma;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
