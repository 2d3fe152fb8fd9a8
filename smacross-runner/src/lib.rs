//! SMA Crossover Runner: configuration, pipeline, chart rendering, export.
//!
//! Sits between the interactive shell and the core engine:
//! - `config`: TOML application settings with per-field defaults
//! - `pipeline`: provider → engine, with a single boundary error type
//! - `chart`: `ChartRenderer` trait and the plotters PNG renderer
//! - `export`: indicator series to CSV
//! - `summary`: the terminal report printed after a run

pub mod chart;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod summary;

pub use chart::{
    chart_filename, save_chart, ChartError, ChartRenderer, ChartRequest, LineData, PngRenderer,
    RenderedChart,
};
pub use config::{AppConfig, ConfigError};
pub use export::{write_indicator_csv, ExportError};
pub use pipeline::{resolve_parameters, run_pipeline, ParameterInputs, RunError};
pub use summary::format_summary;
