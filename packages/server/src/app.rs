//! Application state and router assembly.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use deepseek_client::DeepSeekClient;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use leadgen::{
    ChatCompletion, EnrichmentOrchestrator, HttpFetcher, JobController, MemoryStore, PageFetcher,
    ScraperConfig,
};

use crate::config::Config;
use crate::middleware::session_auth_middleware;
use crate::routes;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub controller: JobController<MemoryStore>,
    pub orchestrator: Arc<EnrichmentOrchestrator<MemoryStore>>,
    /// Alternate-model orchestrator for the lead-enrich endpoint; `None`
    /// when its API key is not configured.
    pub alt_orchestrator: Option<Arc<EnrichmentOrchestrator<MemoryStore>>>,
    pub session_token: Arc<String>,
}

impl AppState {
    /// Wire the default production collaborators from config.
    pub fn from_config(config: &Config) -> Self {
        let scraper_config = ScraperConfig::default();
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(
            scraper_config.user_agent.clone(),
            scraper_config.fetch_timeout,
        ));
        let chat: Arc<dyn ChatCompletion> =
            Arc::new(DeepSeekClient::new(config.deepseek_api_key.clone()));

        // The OpenAI chat-completions wire format is compatible, so the
        // same client type serves the alternate endpoint.
        let alt_chat = config.openai_api_key.clone().map(|key| {
            Arc::new(DeepSeekClient::new(key).with_base_url("https://api.openai.com/v1"))
                as Arc<dyn ChatCompletion>
        });

        Self::new(scraper_config, fetcher, chat, alt_chat)
    }

    /// Wire state from explicit collaborators. Test seam.
    pub fn new(
        scraper_config: ScraperConfig,
        fetcher: Arc<dyn PageFetcher>,
        chat: Arc<dyn ChatCompletion>,
        alt_chat: Option<Arc<dyn ChatCompletion>>,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        let controller = JobController::new(
            Arc::clone(&store),
            Arc::clone(&fetcher),
            scraper_config.clone(),
        );
        let orchestrator = Arc::new(EnrichmentOrchestrator::new(
            Arc::clone(&store),
            chat,
            Arc::clone(&fetcher),
            scraper_config.clone(),
        ));
        let alt_orchestrator = alt_chat.map(|chat| {
            Arc::new(EnrichmentOrchestrator::new(
                Arc::clone(&store),
                chat,
                Arc::clone(&fetcher),
                scraper_config.clone(),
            ))
        });

        Self {
            store,
            controller,
            orchestrator,
            alt_orchestrator,
            session_token: Arc::new(String::new()),
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Arc::new(token.into());
        self
    }
}

/// Build the router: open health endpoint plus token-guarded `/api`.
pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/scraper", post(routes::submit_job).get(routes::recent_jobs))
        .route("/scraper/:id", get(routes::get_job))
        .route("/leads/:id/enrich", post(routes::enrich_lead))
        .route("/leads/:id/analyze", post(routes::analyze_lead))
        .route("/leads/:id/find-contacts", post(routes::find_contacts))
        .route("/companies/:id/analyze", post(routes::analyze_company))
        .route("/ai/generate-email", post(routes::generate_email))
        .route("/ai/suggest-services", post(routes::suggest_services))
        .route("/emails/preview", post(routes::preview_email))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
