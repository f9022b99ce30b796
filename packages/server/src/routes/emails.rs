//! Email-template preview endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use leadgen::email::{lead_template_values, render_template};
use leadgen::{LeadStore, ScrapeError};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEmailRequest {
    pub lead_id: Uuid,
    pub subject: String,
    pub body: String,
}

/// POST /api/emails/preview
///
/// Renders `{{token}}` placeholders against one lead's fields.
pub async fn preview_email(
    State(state): State<AppState>,
    Json(request): Json<PreviewEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let lead = state
        .store
        .get_lead(request.lead_id)
        .await?
        .ok_or(ScrapeError::NotFound {
            kind: "lead",
            id: request.lead_id.to_string(),
        })?;

    let values = lead_template_values(&lead);
    Ok(Json(json!({
        "subject": render_template(&request.subject, &values),
        "body": render_template(&request.body, &values),
    })))
}
