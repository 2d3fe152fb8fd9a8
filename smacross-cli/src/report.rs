//! The one place a failed run is reported.

use smacross_runner::RunError;
use tracing::error;

/// Log a terminal failure with its kind. Bad input and missing data are
/// value errors; anything a collaborator raised is unexpected.
pub fn report_failure(err: &RunError) {
    if err.is_expected() {
        error!(kind = err.kind(), "value error: {err}");
    } else {
        error!(kind = err.kind(), "an unexpected error has occurred: {err}");
    }
}

/// Log a failure that happened before a run could start (config, client setup).
pub fn report_startup_failure(err: &anyhow::Error) {
    error!(kind = "startup", "failed to start: {err:#}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use smacross_core::domain::ValidationError;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn bad_windows_log_as_value_error() {
        let err: RunError = ValidationError::InvalidWindowSize(
            "short window (20) must be less than long window (5)".into(),
        )
        .into();
        report_failure(&err);

        assert!(logs_contain("ERROR"));
        assert!(logs_contain("value error: invalid window size"));
        assert!(logs_contain("kind=\"invalid_window_size\""));
        assert!(!logs_contain("unexpected"));
    }

    #[test]
    #[traced_test]
    fn io_failures_log_as_unexpected() {
        let err = RunError::from(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed",
        ));
        report_failure(&err);

        assert!(logs_contain("an unexpected error has occurred: I/O error: input closed"));
        assert!(logs_contain("kind=\"io\""));
    }

    #[test]
    #[traced_test]
    fn startup_failures_include_the_cause_chain() {
        let err = anyhow::anyhow!("short window (9) must be less than long window (3)")
            .context("loading config from bad.toml");
        report_startup_failure(&err);

        assert!(logs_contain("kind=\"startup\""));
        assert!(logs_contain(
            "failed to start: loading config from bad.toml: short window (9)"
        ));
    }
}
