use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Process-level failures surfaced by the service binary. Request-level
/// failures never reach this type; the router maps those to response
/// envelopes directly.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
}
