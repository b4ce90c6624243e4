//! Crate-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::routing::RouteError;

/// Errors that stop the gateway from being assembled or served.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration could not be read, parsed or validated.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Route groups could not be mounted unambiguously.
    #[error("route table error: {0}")]
    Route(#[from] RouteError),

    /// Listener, TLS material or other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file watcher could not be started.
    #[error("config watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// The Prometheus exporter could not be installed.
    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// A global tracing subscriber was already installed.
    #[error("logging setup failed: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl From<crate::config::ValidationError> for GatewayError {
    fn from(error: crate::config::ValidationError) -> Self {
        GatewayError::Config(ConfigError::Validation(vec![error]))
    }
}
