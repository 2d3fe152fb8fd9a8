//! Domain types for a single SMA crossover run.

pub mod bar;
pub mod params;

pub use bar::{PriceBar, PriceSeries, SeriesError};
pub use params::{
    parse_window, RunParameters, SmaWindows, Ticker, ValidationError, DEFAULT_LONG_WINDOW,
    DEFAULT_SHORT_WINDOW,
};
