//! Logging setup built on `tracing-subscriber`.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line, with color where the terminal supports it.
    #[default]
    Pretty,
    /// Single-line human-readable format.
    Compact,
    /// Newline-delimited JSON, for log aggregation.
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone, Default)]
pub enum LogTarget {
    /// Standard error (the default).
    #[default]
    Stderr,
    /// Standard output.
    Stdout,
}

/// Configuration for [`setup_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    default_level: String,
    format: LogFormat,
    target: LogTarget,
    directives: Vec<String>,
}

impl LogConfig {
    /// Start a config with a default level (e.g. `"info"`, `"debug"`).
    #[must_use]
    pub fn new(default_level: impl Into<String>) -> Self {
        Self {
            default_level: default_level.into(),
            format: LogFormat::default(),
            target: LogTarget::default(),
            directives: Vec::new(),
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output target.
    #[must_use]
    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    /// Add an extra `tracing_subscriber::EnvFilter` directive, e.g.
    /// `"nldb_orchestrator=trace"`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.default_level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;
        for directive in &self.directives {
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e: tracing_subscriber::filter::ParseError| {
                        TelemetryError::ConfigError(e.to_string())
                    })?,
            );
        }
        Ok(filter)
    }
}

/// Install a global `tracing` subscriber built from `config`.
///
/// # Errors
///
/// Returns an error if the filter directives are malformed or a global
/// subscriber is already installed.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;
    let writer: fmt::writer::BoxMakeWriter = match config.target {
        LogTarget::Stderr => fmt::writer::BoxMakeWriter::new(std::io::stderr),
        LogTarget::Stdout => fmt::writer::BoxMakeWriter::new(std::io::stdout),
    };

    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(writer))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(writer))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
    };

    result.map_err(|e| TelemetryError::InitError(e.to_string()))
}

/// Install a global subscriber using `info` level, pretty format, stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filter_with_directives() {
        let config = LogConfig::new("info").with_directive("nldb_orchestrator=trace");
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn builder_defaults() {
        let config = LogConfig::new("debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
