//! Bearer-token session guard.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::app::AppState;

/// Reject any request whose bearer token does not match the configured
/// session token. Runs before any handler work.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h))
        .is_some_and(|token| !state.session_token.is_empty() && token == *state.session_token);

    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })))
            .into_response();
    }

    next.run(request).await
}
