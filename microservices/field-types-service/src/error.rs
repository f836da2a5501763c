//! HTTP mapping for service errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use logscope_core::LogscopeError;
use serde_json::json;

/// Service error carried to the HTTP layer
#[derive(Debug)]
pub struct ApiError(pub LogscopeError);

impl From<LogscopeError> for ApiError {
    fn from(err: LogscopeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.0 {
            LogscopeError::MissingStreamPermission(denial) => json!({
                "error": self.0.to_string(),
                "errorCode": self.0.error_code(),
                "code": status.as_u16(),
                "streamsWithMissingPermissions": denial.streams_with_missing_permissions(),
            }),
            LogscopeError::Validation(message) => json!({
                "error": self.0.to_string(),
                "errorCode": self.0.error_code(),
                "code": status.as_u16(),
                "validationErrors": [message],
            }),
            LogscopeError::Auth(_) | LogscopeError::Unavailable(_) => json!({
                "error": self.0.to_string(),
                "errorCode": self.0.error_code(),
                "code": status.as_u16(),
            }),
            LogscopeError::Config(_)
            | LogscopeError::Catalog(_)
            | LogscopeError::Lookup(_)
            | LogscopeError::Internal(_) => {
                tracing::error!("Internal error: {:?}", self.0);
                json!({
                    "error": "Internal server error",
                    "errorCode": self.0.error_code(),
                    "code": status.as_u16(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
