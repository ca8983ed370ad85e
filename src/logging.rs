//! Diagnostics setup
//!
//! The subscriber is installed before the state file is loaded so that
//! initialization and recovery messages are not lost, but the verbosity is
//! only known once arguments are parsed. The filter therefore sits behind a
//! reload layer and `--log-level` swaps it in afterwards.

use clap::ValueEnum;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Verbosity accepted by `--log-level`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    #[value(alias = "warn")]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Filter directive for this level (critical has no tracing level of its own)
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Handle for adjusting the active filter after startup
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Replace the active filter with `level`
    pub fn set_level(&self, level: LogLevel) {
        if let Err(e) = self
            .handle
            .modify(|filter| *filter = EnvFilter::new(level.directive()))
        {
            eprintln!("Warning: Failed to update log level: {}", e);
        }
    }
}

/// Install the stderr subscriber
///
/// Starts from `RUST_LOG` when set, `info` otherwise.
pub fn init() -> LogHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    LogHandle { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_maps_to_error() {
        assert_eq!(LogLevel::Critical.directive(), "error");
        assert_eq!(LogLevel::Error.directive(), "error");
    }

    #[test]
    fn test_warning_accepts_alias() {
        assert_eq!(LogLevel::from_str("warn", true).unwrap(), LogLevel::Warning);
        assert_eq!(LogLevel::from_str("warning", true).unwrap(), LogLevel::Warning);
    }

    #[test]
    fn test_directives_parse() {
        for level in LogLevel::value_variants() {
            assert!(EnvFilter::try_new(level.directive()).is_ok());
        }
    }
}
