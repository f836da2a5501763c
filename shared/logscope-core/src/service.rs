//! Lifecycle of a Logscope service process: liveness, readiness of the
//! stores it answers from, and signal-driven shutdown.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::error::Result;

/// Served on `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub service_id: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Served on `/ready`. Ready only when every dependency is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub ready: bool,
    pub dependencies: Vec<DependencyStatus>,
}

impl ReadinessStatus {
    pub fn from_dependencies(dependencies: Vec<DependencyStatus>) -> Self {
        Self {
            ready: dependencies.iter().all(|dependency| dependency.available),
            dependencies,
        }
    }
}

/// A store or upstream the service answers from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub latency_ms: Option<u64>,
}

impl DependencyStatus {
    pub fn new(name: impl Into<String>, available: bool) -> Self {
        Self {
            name: name.into(),
            available,
            latency_ms: None,
        }
    }
}

#[async_trait]
pub trait LogscopeService: Send + Sync + 'static {
    fn service_id(&self) -> &'static str;

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    async fn health(&self) -> HealthStatus;

    async fn ready(&self) -> ReadinessStatus;

    /// Runs after the shutdown signal, bounded by `SHUTDOWN_GRACE_SECS`.
    async fn shutdown(&self) -> Result<()>;

    /// Serve until the task is aborted. Takes the shared handle so the
    /// HTTP layer can report this service's own health and readiness.
    async fn start(self: Arc<Self>) -> Result<()>;
}

/// Drives one service from startup to a bounded shutdown
pub struct MicroserviceRuntime {
    config: ServiceConfig,
    start_time: std::time::Instant,
}

impl MicroserviceRuntime {
    pub fn new() -> Result<Self> {
        let config = ServiceConfig::from_env()?;
        Ok(Self {
            config,
            start_time: std::time::Instant::now(),
        })
    }

    /// Start `service`, wait for Ctrl+C or SIGTERM, then give it the grace
    /// period to shut down before its serving task is aborted.
    pub async fn run<S: LogscopeService>(service: Arc<S>) -> Result<()> {
        let runtime = Self::new()?;

        info!(
            service_id = service.service_id(),
            service_name = %runtime.config.service_name,
            version = service.version(),
            "Starting service"
        );

        let mut serving = tokio::spawn(service.clone().start());

        tokio::select! {
            _ = Self::wait_for_shutdown() => {
                info!("Shutdown signal received");
            }
            outcome = &mut serving => {
                match outcome {
                    Ok(Ok(())) => warn!("Service stopped serving before a shutdown signal"),
                    Ok(Err(e)) => error!("Service error: {}", e),
                    Err(e) => error!("Service task failed: {}", e),
                }
            }
        }

        let grace = Duration::from_secs(runtime.config.shutdown_grace_secs);
        match tokio::time::timeout(grace, service.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Error during shutdown: {}", e),
            Err(_) => warn!(grace_secs = grace.as_secs(), "Shutdown timed out"),
        }

        serving.abort();

        info!(
            uptime_seconds = runtime.start_time.elapsed().as_secs(),
            "Service stopped"
        );

        Ok(())
    }

    async fn wait_for_shutdown() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
