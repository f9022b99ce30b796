//! Test doubles for the fetcher and the completion service.
//!
//! Provides configurable mock implementations of the PageFetcher and
//! ChatCompletion traits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use deepseek_client::Message;

use crate::ai::ChatCompletion;
use crate::error::{FetchError, FetchResult, Result, ScrapeError};
use crate::fetch::{FetchedPage, PageFetcher};

/// Mock fetcher serving canned pages by URL.
///
/// URLs without a canned page fail with a network error, so tests can
/// exercise skip-and-continue paths by simply not registering a page.
#[derive(Default)]
pub struct MockFetcher {
    /// Canned pages indexed by URL
    pages: Arc<RwLock<HashMap<String, String>>>,
    /// URLs that fail with a simulated HTTP 500
    failures: Arc<RwLock<Vec<String>>>,
    /// Every URL requested, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page body for a URL.
    pub fn add_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.pages.write().unwrap().insert(url.into(), html.into());
    }

    /// Register a page (builder pattern).
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.add_page(url, html);
        self
    }

    /// Make a URL fail with HTTP 500 even if a page is registered.
    pub fn fail_url(&self, url: impl Into<String>) {
        self.failures.write().unwrap().push(url.into());
    }

    /// Every URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    /// How many times a specific URL was requested.
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.read().unwrap().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.calls.write().unwrap().push(url.to_string());

        if self.failures.read().unwrap().iter().any(|u| u == url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 500,
            });
        }

        match self.pages.read().unwrap().get(url) {
            Some(html) => Ok(FetchedPage::new(url, html.clone())),
            None => Err(FetchError::Network {
                url: url.to_string(),
                message: "no canned page".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Mock completion service returning scripted responses in order.
///
/// When the script runs out the last response repeats; an empty script
/// errors like an unreachable service.
#[derive(Default)]
pub struct MockChat {
    responses: Arc<RwLock<Vec<String>>>,
    /// Message lists received, for prompt assertions
    requests: Arc<RwLock<Vec<Vec<Message>>>>,
    cursor: Arc<RwLock<usize>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one scripted response.
    pub fn push_response(&self, response: impl Into<String>) {
        self.responses.write().unwrap().push(response.into());
    }

    /// Queue a response (builder pattern).
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push_response(response);
        self
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.requests.read().unwrap().len()
    }

    /// The message lists received, in order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.read().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for MockChat {
    async fn complete(&self, messages: Vec<Message>, _temperature: f32) -> Result<String> {
        self.requests.write().unwrap().push(messages);

        let responses = self.responses.read().unwrap();
        if responses.is_empty() {
            return Err(ScrapeError::Ai("no scripted response".to_string()));
        }

        let mut cursor = self.cursor.write().unwrap();
        let index = (*cursor).min(responses.len() - 1);
        *cursor += 1;
        Ok(responses[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetcher_tracks_calls_and_failures() {
        let fetcher = MockFetcher::new().with_page("https://a", "<html>a</html>");
        fetcher.fail_url("https://b");

        assert!(fetcher.fetch("https://a").await.is_ok());
        assert!(matches!(
            fetcher.fetch("https://b").await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://c").await,
            Err(FetchError::Network { .. })
        ));
        assert_eq!(fetcher.calls().len(), 3);
        assert_eq!(fetcher.call_count("https://a"), 1);
    }

    #[tokio::test]
    async fn test_mock_chat_scripts_in_order_then_repeats() {
        let chat = MockChat::new().with_response("one").with_response("two");
        assert_eq!(chat.complete(vec![], 0.5).await.unwrap(), "one");
        assert_eq!(chat.complete(vec![], 0.5).await.unwrap(), "two");
        assert_eq!(chat.complete(vec![], 0.5).await.unwrap(), "two");
        assert_eq!(chat.call_count(), 3);
    }
}
