//! Serializable application configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid config.
//!
//! ```toml
//! [windows]
//! short = 5
//! long = 20
//!
//! [chart]
//! width = 1200
//! height = 800
//! # font = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//!
//! [provider]
//! source = "yahoo"        # yahoo | csv | synthetic
//! data_dir = "data"
//! timeout_secs = 30
//! max_retries = 3
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use smacross_core::data::{DataSource, YahooSettings};
use smacross_core::domain::{SmaWindows, ValidationError, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid [windows] defaults: {0}")]
    Windows(#[from] ValidationError),

    #[error("invalid [chart] size {width}x{height}")]
    ChartSize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub windows: WindowConfig,
    pub chart: ChartConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.windows.defaults()?;
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ConfigError::ChartSize {
                width: self.chart.width,
                height: self.chart.height,
            });
        }
        Ok(())
    }
}

/// Defaults used when a window prompt or flag is left blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub short: usize,
    pub long: usize,
}

impl WindowConfig {
    pub fn defaults(&self) -> Result<SmaWindows, ValidationError> {
        SmaWindows::new(self.short, self.long)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short: DEFAULT_SHORT_WINDOW,
            long: DEFAULT_LONG_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// TrueType font for chart text. Common system locations are tried when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            font: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub source: DataSource,
    pub data_dir: PathBuf,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl ProviderConfig {
    pub fn yahoo_settings(&self) -> YahooSettings {
        YahooSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            ..YahooSettings::default()
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Yahoo,
            data_dir: PathBuf::from("data"),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.windows.defaults().unwrap(), SmaWindows::default());
        assert_eq!(config.provider.source, DataSource::Yahoo);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [windows]
            long = 50

            [provider]
            source = "csv"
            data_dir = "fixtures"
            "#,
        )
        .unwrap();
        assert_eq!(config.windows.short, 5);
        assert_eq!(config.windows.long, 50);
        assert_eq!(config.provider.source, DataSource::Csv);
        assert_eq!(config.provider.data_dir, PathBuf::from("fixtures"));
        assert_eq!(config.provider.max_retries, 3);
        assert_eq!(config.chart.width, 1200);
    }

    #[test]
    fn inverted_window_defaults_are_rejected() {
        let err = AppConfig::from_toml("[windows]\nshort = 30\nlong = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Windows(_)));
    }

    #[test]
    fn chart_font_is_optional() {
        assert_eq!(AppConfig::default().chart.font, None);
        let config = AppConfig::from_toml("[chart]\nfont = \"fonts/Inter.ttf\"\n").unwrap();
        assert_eq!(config.chart.font, Some(PathBuf::from("fonts/Inter.ttf")));
        assert_eq!(config.chart.width, 1200);
    }

    #[test]
    fn zero_chart_size_is_rejected() {
        let err = AppConfig::from_toml("[chart]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ChartSize { width: 0, .. }));
    }

    #[test]
    fn unknown_source_is_a_parse_error() {
        let err = AppConfig::from_toml("[provider]\nsource = \"bloomberg\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn yahoo_settings_follow_provider_section() {
        let config =
            AppConfig::from_toml("[provider]\ntimeout_secs = 5\nmax_retries = 0\n").unwrap();
        let settings = config.provider.yahoo_settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.max_retries, 0);
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smacross.toml");
        std::fs::write(&path, "[chart]\nheight = 600\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.chart.height, 600);

        let missing = AppConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
