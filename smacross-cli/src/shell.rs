//! Interactive shell: gathers run parameters line by line, then drives the pipeline.
//!
//! Works over any `BufRead` / `Write` pair so it can be exercised with
//! in-memory buffers. States advance linearly:
//!
//! CollectingTicker → CollectingStartDate → CollectingEndDate →
//! CollectingWindows → Running → Done
//!
//! Any failure moves to Reporting, then Done. Only a malformed date re-prompts;
//! every other validation failure ends the run.

use chrono::NaiveDate;
use smacross_core::data::DataProvider;
use smacross_core::dates::parse_date;
use smacross_core::domain::{parse_window, RunParameters, SmaWindows, Ticker, ValidationError};
use smacross_runner::{format_summary, run_pipeline, save_chart, ChartRenderer, RunError};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::report::report_failure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    CollectingTicker,
    CollectingStartDate,
    CollectingEndDate,
    CollectingWindows,
    Running,
    Reporting,
    Done,
}

/// What a successful session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub params: RunParameters,
    pub rows: usize,
    pub events: usize,
    pub saved: Option<PathBuf>,
}

pub struct InteractionShell<R, W> {
    input: R,
    output: W,
    today: NaiveDate,
    defaults: SmaWindows,
    state: ShellState,
}

impl<R: BufRead, W: Write> InteractionShell<R, W> {
    pub fn new(input: R, output: W, today: NaiveDate, defaults: SmaWindows) -> Self {
        Self {
            input,
            output,
            today,
            defaults,
            state: ShellState::CollectingTicker,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run one full session. Failures are logged here and also returned.
    pub fn run(
        &mut self,
        provider: &dyn DataProvider,
        renderer: &dyn ChartRenderer,
        save_dir: &Path,
    ) -> Result<SessionOutcome, RunError> {
        let result = self.run_session(provider, renderer, save_dir);
        if let Err(err) = &result {
            self.transition(ShellState::Reporting);
            report_failure(err);
        }
        self.transition(ShellState::Done);
        result
    }

    fn run_session(
        &mut self,
        provider: &dyn DataProvider,
        renderer: &dyn ChartRenderer,
        save_dir: &Path,
    ) -> Result<SessionOutcome, RunError> {
        let params = self.collect_parameters()?;

        self.transition(ShellState::Running);
        let indicators = run_pipeline(&params, provider)?;
        write!(self.output, "{}", format_summary(&indicators))?;

        let saved = if self.confirm_save()? {
            Some(save_chart(&indicators, renderer, save_dir)?)
        } else {
            None
        };

        Ok(SessionOutcome {
            params,
            rows: indicators.len(),
            events: indicators.events().len(),
            saved,
        })
    }

    /// Prompt for ticker, dates, and windows, validating each step in order.
    pub fn collect_parameters(&mut self) -> Result<RunParameters, RunError> {
        self.transition(ShellState::CollectingTicker);
        let ticker = Ticker::parse(&self.read_line("Enter stock ticker: ")?)?;

        self.transition(ShellState::CollectingStartDate);
        let start = self
            .prompt_date("Enter start date (YYYY-MM-DD): ")?
            .ok_or(RunError::MissingStartDate)?;

        self.transition(ShellState::CollectingEndDate);
        let end = self
            .prompt_date("Enter end date (YYYY-MM-DD) or press Enter for today: ")?
            .unwrap_or(self.today);
        if start >= end {
            return Err(ValidationError::InvalidDateOrder { start, end }.into());
        }

        self.transition(ShellState::CollectingWindows);
        let short_input = self.read_line(&format!(
            "Enter short SMA window (default {}): ",
            self.defaults.short()
        ))?;
        let long_input = self.read_line(&format!(
            "Enter long SMA window (default {}): ",
            self.defaults.long()
        ))?;
        let windows = SmaWindows::new(
            parse_window(&short_input, self.defaults.short())?,
            parse_window(&long_input, self.defaults.long())?,
        )?;

        Ok(RunParameters::new(ticker, start, end, windows)?)
    }

    /// `y` / `yes` (any case) means save; anything else, including blank, means no.
    pub fn confirm_save(&mut self) -> Result<bool, RunError> {
        let answer = self.read_line("Do you want to save the plot? (y/n): ")?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    /// Re-prompts until the answer is blank or a valid calendar date.
    fn prompt_date(&mut self, prompt: &str) -> Result<Option<NaiveDate>, RunError> {
        loop {
            let answer = self.read_line(prompt)?;
            match parse_date(&answer) {
                Ok(date) => return Ok(date),
                Err(err) => {
                    debug!(%err, "re-prompting for date");
                    writeln!(
                        self.output,
                        "Incorrect date format. Please enter the date in YYYY-MM-DD format."
                    )?;
                }
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, RunError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RunError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed before all answers were given",
            )));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn transition(&mut self, next: ShellState) {
        debug!(from = ?self.state, to = ?next, "shell state");
        self.state = next;
    }
}
