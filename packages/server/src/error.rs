//! HTTP error mapping for pipeline errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadgen::ScrapeError;
use serde_json::json;
use tracing::error;

/// Error wrapper carrying the HTTP mapping.
pub struct ApiError(pub ScrapeError);

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        Self(e)
    }
}

impl From<leadgen::StoreError> for ApiError {
    fn from(e: leadgen::StoreError) -> Self {
        Self(ScrapeError::Store(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ScrapeError::NotFound { kind, id } => {
                (StatusCode::NOT_FOUND, format!("{} not found: {}", kind, id))
            }
            ScrapeError::MissingApiKey { service } => (
                StatusCode::BAD_REQUEST,
                format!("{} API key not configured", service),
            ),
            other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
