//! Field Types Service configuration

use logscope_core::{LogscopeError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FieldTypesServiceConfig {
    pub http_bind: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry_secs: u64,
    pub seed_file: Option<PathBuf>,
}

impl FieldTypesServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            http_bind: std::env::var("HTTP_BIND")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            jwt_issuer: std::env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "logscope".to_string()),
            jwt_expiry_secs: match std::env::var("JWT_EXPIRY_SECS") {
                Ok(value) => value
                    .parse()
                    .map_err(|e| LogscopeError::Config(format!("Invalid JWT_EXPIRY_SECS: {}", e)))?,
                Err(_) => 3600,
            },
            seed_file: std::env::var("SEED_FILE").ok().map(PathBuf::from),
        })
    }
}
