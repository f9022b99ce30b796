//! Outreach-email generation endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateEmailRequest {
    pub lead_id: Uuid,
}

/// POST /api/ai/generate-email
pub async fn generate_email(
    State(state): State<AppState>,
    Json(request): Json<GenerateEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = state.orchestrator.generate_email(request.lead_id).await?;
    Ok(Json(json!({ "success": true, "email": email })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestServicesRequest {
    pub company_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

/// POST /api/ai/suggest-services
///
/// Ranks the service catalog for an arbitrary company description; the
/// company does not have to exist in the store.
pub async fn suggest_services(
    State(state): State<AppState>,
    Json(request): Json<SuggestServicesRequest>,
) -> Result<Json<Value>, ApiError> {
    let suggestions = state
        .orchestrator
        .suggest_services(
            &request.company_name,
            request.description.as_deref().unwrap_or(""),
            request.industry.as_deref(),
        )
        .await?;
    Ok(Json(json!({ "success": true, "suggestions": suggestions })))
}
