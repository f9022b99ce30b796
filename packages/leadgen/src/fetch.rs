//! Single-page HTTP fetching with browser-like headers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};

/// A successfully fetched page body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Requested URL
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// Raw response body
    pub html: String,
    /// HTTP status code
    pub status: u16,
    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Build a page record for tests and mocks.
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            html: html.into(),
            status: 200,
            fetched_at: Utc::now(),
        }
    }
}

/// One outbound GET with a hard timeout. No retries; the caller decides
/// whether a failure is fatal to the job or skippable for one item.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage>;

    /// Fetcher name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// HTTP fetcher that presents itself as a desktop browser.
///
/// Listing sites reject default client identifiers, so every request
/// carries a realistic User-Agent and accept headers.
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher with the given user agent and hard timeout.
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        if url::Url::parse(url).is_err() {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
            });
        }

        debug!(url = %url, "fetching page");

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "request failed");
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Network {
                        url: url.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!(url = %url, bytes = html.len(), "page fetched");

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            html,
            status: status.as_u16(),
            fetched_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
