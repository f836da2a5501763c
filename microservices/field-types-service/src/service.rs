//! The running field types service: stores, resolver and HTTP surface

use logscope_core::{
    DependencyStatus, HealthStatus, LogscopeService, ReadinessStatus, Result,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::api;
use crate::auth::AuthService;
use crate::catalog::InMemoryStreamCatalog;
use crate::config::FieldTypesServiceConfig;
use crate::lookup::InMemoryFieldTypeIndex;
use crate::metrics::ApiMetrics;
use crate::resolver::FieldTypeResolver;
use crate::seed;

pub struct FieldTypesService {
    config: FieldTypesServiceConfig,
    catalog: InMemoryStreamCatalog,
    index: InMemoryFieldTypeIndex,
    resolver: FieldTypeResolver,
    auth_service: AuthService,
    metrics: ApiMetrics,
    start_time: Instant,
}

impl FieldTypesService {
    /// Build the stores and load `SEED_FILE` when configured
    pub async fn from_config(config: FieldTypesServiceConfig) -> Result<Self> {
        let catalog = InMemoryStreamCatalog::new();
        let index = InMemoryFieldTypeIndex::new();
        if let Some(path) = &config.seed_file {
            seed::load_seed(path, &catalog, &index).await?;
        }
        Ok(Self::with_stores(config, catalog, index))
    }

    pub fn with_stores(
        config: FieldTypesServiceConfig,
        catalog: InMemoryStreamCatalog,
        index: InMemoryFieldTypeIndex,
    ) -> Self {
        let resolver = FieldTypeResolver::new(Arc::new(catalog.clone()), Arc::new(index.clone()));
        let auth_service = AuthService::new(&config.jwt_secret, &config.jwt_issuer, config.jwt_expiry_secs);

        Self {
            config,
            catalog,
            index,
            resolver,
            auth_service,
            metrics: ApiMetrics::new(),
            start_time: Instant::now(),
        }
    }

    pub fn auth_service(&self) -> &AuthService {
        &self.auth_service
    }

    /// Router whose `/health` and `/ready` report on this instance
    pub fn router(self: &Arc<Self>) -> axum::Router {
        api::create_router(
            self.resolver.clone(),
            self.auth_service.clone(),
            self.metrics.clone(),
            self.clone(),
        )
    }
}

#[async_trait::async_trait]
impl LogscopeService for FieldTypesService {
    fn service_id(&self) -> &'static str {
        "field-types-service"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Not ready until both stores hold data
    async fn ready(&self) -> ReadinessStatus {
        ReadinessStatus::from_dependencies(vec![
            DependencyStatus::new("stream-catalog", !self.catalog.is_empty()),
            DependencyStatus::new("field-type-index", !self.index.is_empty()),
        ])
    }

    async fn shutdown(&self) -> Result<()> {
        info!(
            requests = self.metrics.requests.get(),
            denied = self.metrics.denied.get(),
            failures = self.metrics.failures.get(),
            "Shutting down Field Types Service"
        );
        Ok(())
    }

    async fn start(self: Arc<Self>) -> Result<()> {
        info!(
            http = %self.config.http_bind,
            streams = self.catalog.len(),
            indices = self.index.len(),
            "Starting Field Types Service server"
        );

        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
