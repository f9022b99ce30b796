//! Typed errors for the scrape and enrichment pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while running a scrape job or enrichment.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Page fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Completion service failed
    #[error("AI service error: {0}")]
    Ai(String),

    /// Required upstream API key is missing
    #[error("missing API key for {service}")]
    MissingApiKey { service: String },

    /// Referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The very first listing page could not be fetched; nothing to crawl
    #[error("failed to fetch listing page: {url}")]
    ListingUnreachable { url: String },

    /// JSON serialization of a result summary or analysis payload failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from a single page fetch.
///
/// The caller decides whether a failure is fatal to the job or
/// skippable for one item; the fetcher itself never retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx HTTP status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Connection-level failure (DNS, refused, reset)
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// Hard timeout elapsed
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Errors from the external store collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row lookup failed
    #[error("record not found: {0}")]
    NotFound(String),

    /// Backend failure
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
