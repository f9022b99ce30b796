//! Company analysis endpoint.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// POST /api/companies/:id/analyze
pub async fn analyze_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let analysis = state.orchestrator.analyze_company(id).await?;
    Ok(Json(json!({ "success": true, "analysis": analysis })))
}
