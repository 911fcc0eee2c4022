//! Diagnostic logging setup.
//!
//! Events go to stderr so that stdout only ever carries rendered command
//! output, which scripts pipe into other tools.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The fallback level is not a valid filter directive.
    #[error("invalid log level [{level}]: {message}")]
    InvalidLevel {
        /// Directive that failed to parse.
        level: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Builds the filter from `RUST_LOG`, falling back to `level`.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidLevel`] when `RUST_LOG` is unset and
/// `level` does not parse as a filter directive.
pub fn filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(level.trim()).map_err(|err| LoggingError::InvalidLevel {
            level: level.to_owned(),
            message: err.to_string(),
        })
    })
}

/// Installs a compact stderr subscriber.
///
/// # Errors
///
/// Returns [`LoggingError`] when the level is invalid or a subscriber is
/// already installed.
pub fn init(level: &str) -> Result<(), LoggingError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(level)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| LoggingError::Install(err.to_string()))
}
