//! Logscope Telemetry
//!
//! Structured logging setup and in-process metric primitives.

mod config;
mod tracing_setup;
mod metrics;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;
pub use metrics::{Counter, Histogram, HistogramSnapshot};

/// Install logging for a service from `LOG_LEVEL`, `RUST_LOG` and `JSON_LOGS`
pub fn init(service_name: &str) -> Result<(), TelemetryError> {
    let config = TelemetryConfig::from_env();
    init_tracing(service_name, &config)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),
}
