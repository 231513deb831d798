use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::domain::DomainError;

/// JSON error surface of the `/api/v1` routes.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self.0 {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION", msg.clone()),
            DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            DomainError::Timeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "An upstream service timed out.".to_string(),
            ),
            DomainError::ExternalService(_) => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "Upstream service is unavailable.".to_string(),
            ),
            DomainError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (
            status,
            Json(ApiErrorResponse {
                error: ApiErrorBody {
                    code: code.to_string(),
                    message,
                },
            }),
        )
            .into_response()
    }
}
