//! Tracing subscriber installation.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TelemetryError {
    /// The filter directive failed to parse.
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a formatting tracing subscriber honouring the given filter
/// directive (e.g. `info` or `fieldline=debug`). The `RUST_LOG` environment
/// variable, when set, overrides the directive.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the directive fails to
/// parse and [`TelemetryError::Install`] when a subscriber is already
/// installed.
pub fn init(filter: &str) -> Result<(), TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter));
    let env_filter = env_filter.map_err(|err| TelemetryError::InvalidFilter(err.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}
