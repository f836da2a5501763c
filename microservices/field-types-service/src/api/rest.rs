//! Field Types REST API

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use logscope_core::{
    FieldTypesForStreamsRequest, HealthStatus, LogscopeError, LogscopeService, MappedFieldType,
    ReadinessStatus, Result, ValidationMessage,
};
use serde_json::error::Category;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::metrics::{ApiMetrics, MetricsSnapshot};
use crate::resolver::FieldTypeResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: FieldTypeResolver,
    pub auth_service: AuthService,
    pub metrics: ApiMetrics,
    pub service: Arc<dyn LogscopeService>,
}

pub fn create_router(
    resolver: FieldTypeResolver,
    auth_service: AuthService,
    metrics: ApiMetrics,
    service: Arc<dyn LogscopeService>,
) -> Router {
    let state = AppState {
        resolver,
        auth_service,
        metrics,
        service,
    };

    Router::new()
        // Health
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(metrics_snapshot))
        // Field types
        .route("/v1/views/fields", get(all_field_types).post(field_types_by_streams))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.health().await)
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessStatus>) {
    let status = state.service.ready().await;
    let code = if status.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn metrics_snapshot(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn all_field_types(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> std::result::Result<Json<BTreeSet<MappedFieldType>>, ApiError> {
    let started = Instant::now();

    let result = async {
        let user = state.auth_service.authenticate(&headers)?.search_user();
        state.resolver.resolve_all_permitted(&user).await
    }
    .await;

    observe(&state.metrics, started, &result);
    Ok(Json(result?))
}

async fn field_types_by_streams(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Json<BTreeSet<MappedFieldType>>, ApiError> {
    let started = Instant::now();

    let result = async {
        let user = state.auth_service.authenticate(&headers)?.search_user();
        let request = parse_request(&body)?;
        state.resolver.resolve_for_streams(&request, &user).await
    }
    .await;

    observe(&state.metrics, started, &result);
    Ok(Json(result?))
}

fn observe<T>(metrics: &ApiMetrics, started: Instant, result: &Result<T>) {
    metrics.requests.inc();
    metrics.latency_ms.record(started.elapsed().as_secs_f64() * 1000.0);
    match result {
        Ok(_) => {}
        Err(LogscopeError::MissingStreamPermission(_)) => metrics.denied.inc(),
        Err(LogscopeError::Auth(_)) | Err(LogscopeError::Validation(_)) => {}
        Err(_) => metrics.failures.inc(),
    }
}

/// Parse the request body, keeping the parser's position for the caller
fn parse_request(body: &[u8]) -> Result<FieldTypesForStreamsRequest> {
    serde_json::from_slice(body).map_err(|e| {
        let error_type = match e.classify() {
            Category::Syntax => "SYNTAX_ERROR",
            Category::Eof => "UNEXPECTED_EOF",
            Category::Data => "INVALID_REQUEST",
            Category::Io => "IO_ERROR",
        };
        let line = u32::try_from(e.line()).unwrap_or(u32::MAX);
        let column = u32::try_from(e.column()).unwrap_or(u32::MAX);

        LogscopeError::Validation(
            ValidationMessage::new(e.to_string())
                .with_error_type(error_type)
                .at(line, column),
        )
    })
}
