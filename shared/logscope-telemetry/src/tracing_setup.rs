//! Global subscriber for service binaries

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// `RUST_LOG` wins when present; otherwise the configured `LOG_LEVEL` directives apply.
fn level_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => directives(&config.log_level),
    }
}

fn directives(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(log_level)
        .map_err(|e| TelemetryError::TracingInit(format!("Invalid LOG_LEVEL {:?}: {}", log_level, e)))
}

/// Install JSON or plain formatted output, filtered by level
pub fn init_tracing(service_name: &str, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = level_filter(config)?;

    let json = config
        .json_logs
        .then(|| fmt::layer().json().with_target(true).with_thread_ids(true));
    let plain = (!config.json_logs).then(|| fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .try_init()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    tracing::info!(
        service = service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}
