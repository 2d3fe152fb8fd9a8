//! Crossover chart: request model, renderer trait, and the plotters PNG renderer.
//!
//! The renderer draws into an in-memory RGB buffer. Nothing touches the
//! filesystem until `RenderedChart::save` is called, so a run that never opts
//! in to saving never creates a file.

use chrono::NaiveDate;
use plotters::prelude::*;
use smacross_core::indicators::{IndicatorRow, IndicatorSeries};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);

/// Tried in order when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT: OnceLock<Result<PathBuf, String>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot: indicator series is empty")]
    Empty,

    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("failed to write {path}: {reason}")]
    Save { path: String, reason: String },

    #[error("no usable font: {0}")]
    Font(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// `{TICKER}_SMA_Crossover.png`
pub fn chart_filename(ticker: &str) -> String {
    format!("{ticker}_SMA_Crossover.png")
}

/// A labeled line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineData {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl LineData {
    fn from_rows(
        series: &IndicatorSeries,
        label: String,
        value: impl Fn(&IndicatorRow) -> f64,
    ) -> Self {
        Self {
            label,
            points: series.rows().iter().map(|r| (r.date, value(r))).collect(),
        }
    }
}

/// Everything a renderer needs, detached from the indicator types.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub title: String,
    pub close: LineData,
    pub sma_short: LineData,
    pub sma_long: LineData,
    pub buy_points: Vec<(NaiveDate, f64)>,
    pub sell_points: Vec<(NaiveDate, f64)>,
}

impl ChartRequest {
    pub fn from_indicators(series: &IndicatorSeries) -> Self {
        let windows = series.windows();
        Self {
            title: format!("{} SMA Crossover", series.ticker()),
            close: LineData::from_rows(series, "Close".into(), |r| r.close),
            sma_short: LineData::from_rows(
                series,
                format!("SMA Short ({})", windows.short()),
                |r| r.sma_short,
            ),
            sma_long: LineData::from_rows(
                series,
                format!("SMA Long ({})", windows.long()),
                |r| r.sma_long,
            ),
            buy_points: series.buy_points(),
            sell_points: series.sell_points(),
        }
    }

    /// Date span and padded price span covering every line.
    fn bounds(&self) -> Option<(Range<NaiveDate>, Range<f64>)> {
        let first = self.close.points.first()?.0;
        let last = self.close.points.last()?.0;
        let last = if last > first {
            last
        } else {
            last.succ_opt().unwrap_or(last)
        };

        let values = [&self.close, &self.sma_short, &self.sma_long]
            .into_iter()
            .flat_map(|l| l.points.iter().map(|p| p.1));
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };

        Some((first..last, (lo - pad)..(hi + pad)))
    }
}

/// Raw RGB pixels for a drawn chart.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RenderedChart {
    /// Encode as PNG at `path`.
    pub fn save(&self, path: &Path) -> Result<(), ChartError> {
        image::save_buffer(path, &self.rgb, self.width, self.height, image::ColorType::Rgb8)
            .map_err(|e| ChartError::Save {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

/// Turns a request into a drawn artifact.
pub trait ChartRenderer {
    fn render(&self, request: &ChartRequest) -> Result<RenderedChart, ChartError>;
}

/// Render `series` and write it as `{TICKER}_SMA_Crossover.png` inside `dir`.
pub fn save_chart(
    series: &IndicatorSeries,
    renderer: &dyn ChartRenderer,
    dir: &Path,
) -> Result<PathBuf, ChartError> {
    let request = ChartRequest::from_indicators(series);
    let chart = renderer.render(&request)?;
    let path = dir.join(chart_filename(series.ticker()));
    chart.save(&path)?;
    info!(path = %path.display(), "plot saved as {}", chart_filename(series.ticker()));
    Ok(path)
}

/// Register the chart font with plotters once per process.
///
/// The first call wins; later calls return the outcome of the first.
fn ensure_font(configured: Option<&Path>) -> Result<(), ChartError> {
    FONT.get_or_init(|| {
        let candidates: Vec<PathBuf> = match configured {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
        };
        let path = candidates
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| match configured {
                Some(p) => format!("{} not found", p.display()),
                None => "no system font found; set [chart] font".to_string(),
            })?;
        let bytes = std::fs::read(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        // plotters keeps registered fonts for the life of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
            .map_err(|_| format!("{} is not a usable TrueType font", path.display()))?;
        debug!(font = %path.display(), "registered chart font");
        Ok(path)
    })
    .as_ref()
    .map(|_| ())
    .map_err(|reason| ChartError::Font(reason.clone()))
}

/// plotters bitmap renderer.
#[derive(Debug, Clone)]
pub struct PngRenderer {
    width: u32,
    height: u32,
    font: Option<PathBuf>,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<PathBuf>) -> Self {
        self.font = font;
        self
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(1200, 800)
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&self, request: &ChartRequest) -> Result<RenderedChart, ChartError> {
        let (x_range, y_range) = request.bounds().ok_or(ChartError::Empty)?;
        ensure_font(self.font.as_deref())?;
        let mut rgb = vec![0u8; self.width as usize * self.height as usize * 3];

        {
            let root =
                BitMapBackend::with_buffer(&mut rgb, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&request.title, ("sans-serif", 28))
                .margin(15)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(RangedDate::from(x_range), y_range)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Price in $")
                .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
                .y_label_formatter(&|v: &f64| format!("{v:.2}"))
                .draw()
                .map_err(draw_err)?;

            for (line, color) in [
                (&request.close, BLUE),
                (&request.sma_short, RED),
                (&request.sma_long, DARK_GREEN),
            ] {
                chart
                    .draw_series(LineSeries::new(
                        line.points.iter().copied(),
                        color.stroke_width(2),
                    ))
                    .map_err(draw_err)?
                    .label(line.label.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
            }

            chart
                .draw_series(request.buy_points.iter().map(|&point| {
                    EmptyElement::at(point)
                        + Polygon::new(vec![(0, -7), (-7, 6), (7, 6)], DARK_GREEN.filled())
                }))
                .map_err(draw_err)?
                .label("Buy")
                .legend(|(x, y)| {
                    Polygon::new(
                        vec![(x + 10, y - 6), (x + 4, y + 5), (x + 16, y + 5)],
                        DARK_GREEN.filled(),
                    )
                });

            chart
                .draw_series(request.sell_points.iter().map(|&point| {
                    EmptyElement::at(point)
                        + Polygon::new(vec![(0, 7), (-7, -6), (7, -6)], RED.filled())
                }))
                .map_err(draw_err)?
                .label("Sell")
                .legend(|(x, y)| {
                    Polygon::new(
                        vec![(x + 10, y + 6), (x + 4, y - 5), (x + 16, y - 5)],
                        RED.filled(),
                    )
                });

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        Ok(RenderedChart {
            width: self.width,
            height: self.height,
            rgb,
        })
    }
}
