//! Process-level settings shared by every Logscope service

use crate::error::{LogscopeError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub shutdown_grace_secs: u64,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "unknown".to_string()),
            shutdown_grace_secs: env::var("SHUTDOWN_GRACE_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| LogscopeError::Config(format!("Invalid SHUTDOWN_GRACE_SECS: {}", e)))?,
        })
    }
}
