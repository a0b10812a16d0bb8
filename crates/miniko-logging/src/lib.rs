//! # miniko-logging
//!
//! Structured logging with `tracing`.
//!
//! Installs one global subscriber writing to stderr, so command output on
//! stdout stays clean. The filter comes from `RUST_LOG` when set, otherwise
//! from the configured level directive.

#![deny(unsafe_code)]

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format for log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Configuration for the logging subsystem.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Default filter directive (e.g. `warn`, `miniko_store=debug`).
    /// Overridden by `RUST_LOG`.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The level directive could not be parsed.
    #[error("invalid log filter {directive:?}: {source}")]
    InvalidFilter {
        /// The directive as configured.
        directive: String,
        /// Parser error from `tracing-subscriber`.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("logging already initialized")]
    AlreadyInitialized,
}

/// Build the filter: `RUST_LOG` if present and valid, else `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|source| LoggingError::InvalidFilter {
        directive: level.to_string(),
        source,
    })
}

/// Initialize logging. Call once at startup.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(&config.level)?;

    let fmt_layer = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_list(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert_eq!(config.format, LogFormat::Compact);
    }

    #[test]
    fn invalid_directive_is_reported() {
        // Only meaningful when RUST_LOG does not shadow the directive.
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_filter("miniko_store=loud").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidFilter { .. }));
        assert!(err.to_string().contains("miniko_store=loud"));
    }

    #[test]
    fn valid_directives_parse() {
        for level in ["warn", "debug", "miniko_store=trace,warn"] {
            assert!(build_filter(level).is_ok(), "{level}");
        }
    }

    #[test]
    fn second_init_is_rejected() {
        let config = LoggingConfig {
            level: "error".to_string(),
            format: LogFormat::Json,
        };
        init_logging(&config).unwrap();
        assert!(matches!(
            init_logging(&config),
            Err(LoggingError::AlreadyInitialized)
        ));
    }
}
