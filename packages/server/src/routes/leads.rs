//! Lead enrichment endpoints.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use leadgen::ScrapeError;

use crate::app::AppState;
use crate::error::ApiError;

/// POST /api/leads/:id/enrich
///
/// Uses the alternate hosted model; a missing key for it is reported to
/// the caller rather than silently defaulted.
pub async fn enrich_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let orchestrator = state
        .alt_orchestrator
        .as_ref()
        .ok_or(ScrapeError::MissingApiKey {
            service: "OpenAI".to_string(),
        })?;

    let (summary, approach) = orchestrator.enrich_lead(id).await?;
    Ok(Json(json!({
        "success": true,
        "aiSummary": summary,
        "aiRecommendedApproach": approach,
    })))
}

/// POST /api/leads/:id/analyze
pub async fn analyze_lead(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let analysis = state.orchestrator.analyze_lead(id).await?;
    Ok(Json(json!({ "success": true, "analysis": analysis })))
}

/// POST /api/leads/:id/find-contacts
pub async fn find_contacts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let report = state.orchestrator.search_contacts(id).await?;
    Ok(Json(json!({ "success": true, "contacts": report })))
}
