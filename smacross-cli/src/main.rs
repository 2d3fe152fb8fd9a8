//! smacross CLI: SMA crossover analysis for a single ticker.
//!
//! Commands:
//! - (none): interactive shell: prompts for ticker, dates, and windows
//! - `run`: same pipeline driven by flags, for scripts

mod logging;
mod report;
mod shell;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use smacross_core::data::{CsvProvider, DataProvider, DataSource, SyntheticProvider, YahooProvider};
use smacross_core::dates::parse_date;
use smacross_core::domain::SmaWindows;
use smacross_runner::{
    format_summary, resolve_parameters, run_pipeline, save_chart, write_indicator_csv, AppConfig,
    ParameterInputs, PngRenderer, RunError,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use crate::report::{report_failure, report_startup_failure};
use crate::shell::InteractionShell;

#[derive(Parser)]
#[command(
    name = "smacross",
    version,
    about = "Simple moving average crossover analysis for a stock ticker"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where to load daily closes from. Overrides the config file.
    #[arg(long, value_enum, global = true)]
    source: Option<SourceArg>,

    /// Directory holding `{TICKER}.csv` files for `--source csv`.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one analysis from flags instead of prompts.
    Run {
        /// Stock ticker symbol (e.g., AAPL).
        #[arg(long)]
        ticker: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Short SMA window. Defaults to the configured value.
        #[arg(long, default_value = "")]
        short: String,

        /// Long SMA window. Defaults to the configured value.
        #[arg(long, default_value = "")]
        long: String,

        /// Save the chart as {TICKER}_SMA_Crossover.png in the working directory.
        #[arg(long, default_value_t = false)]
        save: bool,

        /// Write the indicator rows to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Yahoo,
    Csv,
    Synthetic,
}

impl From<SourceArg> for DataSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Yahoo => DataSource::Yahoo,
            SourceArg::Csv => DataSource::Csv,
            SourceArg::Synthetic => DataSource::Synthetic,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref(), cli.source, cli.data_dir) {
        Ok(config) => config,
        Err(err) => {
            logging::init_tracing(&AppConfig::default().logging.level);
            report_startup_failure(&err);
            return ExitCode::FAILURE;
        }
    };
    logging::init_tracing(&config.logging.level);

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            report_startup_failure(&err);
            ExitCode::FAILURE
        }
    }
}

/// Read the config file, if any, and apply flag overrides.
fn load_config(
    path: Option<&Path>,
    source: Option<SourceArg>,
    data_dir: Option<PathBuf>,
) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, source, data_dir);
    Ok(config)
}

/// Set up collaborators and run one session. `Err` means the run never started;
/// run failures are reported here and become `ExitCode::FAILURE`.
fn run(command: Option<Commands>, config: &AppConfig) -> Result<ExitCode> {
    let defaults = config.windows.defaults().context("invalid window defaults")?;
    let provider = build_provider(config)?;
    let renderer = PngRenderer::new(config.chart.width, config.chart.height)
        .with_font(config.chart.font.clone());
    let today = chrono::Local::now().date_naive();
    let cwd = std::env::current_dir().context("resolving working directory")?;

    let outcome = match command {
        None => {
            let stdin = std::io::stdin();
            let mut shell =
                InteractionShell::new(stdin.lock(), std::io::stdout(), today, defaults);
            let result = shell.run(provider.as_ref(), &renderer, &cwd);
            debug!(state = ?shell.state(), "shell finished");
            result.map(|session| {
                info!(
                    ticker = session.params.ticker.as_str(),
                    rows = session.rows,
                    events = session.events,
                    saved = ?session.saved,
                    "session complete"
                );
            })
        }
        Some(Commands::Run {
            ticker,
            start,
            end,
            short,
            long,
            save,
            export,
        }) => {
            let flags = RunFlags {
                ticker: &ticker,
                start: &start,
                end: end.as_deref(),
                short: &short,
                long: &long,
                save,
                export: export.as_deref(),
            };
            let result = run_from_flags(
                &flags,
                today,
                defaults,
                provider.as_ref(),
                &renderer,
                &cwd,
            );
            if let Err(err) = &result {
                report_failure(err);
            }
            result
        }
    };

    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

fn apply_overrides(config: &mut AppConfig, source: Option<SourceArg>, data_dir: Option<PathBuf>) {
    if let Some(source) = source {
        config.provider.source = source.into();
    }
    if let Some(dir) = data_dir {
        config.provider.data_dir = dir;
    }
}

fn build_provider(config: &AppConfig) -> Result<Box<dyn DataProvider>> {
    let provider: Box<dyn DataProvider> = match config.provider.source {
        DataSource::Yahoo => Box::new(
            YahooProvider::new(config.provider.yahoo_settings())
                .context("building Yahoo Finance client")?,
        ),
        DataSource::Csv => Box::new(CsvProvider::new(config.provider.data_dir.clone())),
        DataSource::Synthetic => Box::new(SyntheticProvider::default()),
    };
    info!(source = config.provider.source.as_str(), "using data provider");
    Ok(provider)
}

struct RunFlags<'a> {
    ticker: &'a str,
    start: &'a str,
    end: Option<&'a str>,
    short: &'a str,
    long: &'a str,
    save: bool,
    export: Option<&'a Path>,
}

/// Flag-driven run. Unlike the shell, a malformed date is fatal here.
fn run_from_flags(
    flags: &RunFlags<'_>,
    today: NaiveDate,
    defaults: SmaWindows,
    provider: &dyn DataProvider,
    renderer: &PngRenderer,
    save_dir: &Path,
) -> Result<(), RunError> {
    let inputs = ParameterInputs {
        ticker: flags.ticker,
        start: parse_date(flags.start)?,
        end: flags.end.map(parse_date).transpose()?.flatten(),
        short: flags.short,
        long: flags.long,
    };
    let params = resolve_parameters(&inputs, today, defaults)?;
    let indicators = run_pipeline(&params, provider)?;

    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", format_summary(&indicators))?;
    stdout.flush()?;

    if flags.save {
        save_chart(&indicators, renderer, save_dir)?;
    }
    if let Some(path) = flags.export {
        write_indicator_csv(path, &indicators)?;
        info!(path = %path.display(), "indicator rows exported");
    }
    Ok(())
}
