//! Field Types Service binary

use field_types_service::{FieldTypesService, FieldTypesServiceConfig};
use logscope_core::{LogscopeError, MicroserviceRuntime, Result};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logscope_telemetry::init("field-types-service")
        .map_err(|e| LogscopeError::Config(e.to_string()))?;

    info!("Starting Field Types Service");

    let config = FieldTypesServiceConfig::from_env()?;
    let service = Arc::new(FieldTypesService::from_config(config).await?);
    MicroserviceRuntime::run(service).await
}
