//! Scrape-job submission and polling.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use leadgen::{JobKind, JobStore, ScrapeError, ScrapeJob};

use crate::app::AppState;
use crate::error::ApiError;

/// How many rows the job listing returns.
const RECENT_JOBS_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub url: String,
    pub job_type: JobKind,
    #[serde(default)]
    pub max_pages: Option<usize>,
}

/// POST /api/scraper
///
/// Returns the created job row synchronously; the crawl itself runs
/// out-of-band and is observed by polling.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> Result<Json<ScrapeJob>, ApiError> {
    let job = state
        .controller
        .submit(request.url, request.job_type, request.max_pages)
        .await?;
    Ok(Json(job))
}

/// GET /api/scraper
pub async fn recent_jobs(State(state): State<AppState>) -> Result<Json<Vec<ScrapeJob>>, ApiError> {
    let jobs = state.store.list_recent_jobs(RECENT_JOBS_LIMIT).await?;
    Ok(Json(jobs))
}

/// GET /api/scraper/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScrapeJob>, ApiError> {
    let job = state
        .store
        .get_job(id)
        .await?
        .ok_or(ScrapeError::NotFound {
            kind: "job",
            id: id.to_string(),
        })?;
    Ok(Json(job))
}
