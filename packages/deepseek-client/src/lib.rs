//! Pure DeepSeek REST API client
//!
//! A clean, minimal client for the DeepSeek chat-completions API with no
//! domain-specific logic. The wire contract is OpenAI-compatible.
//!
//! # Example
//!
//! ```rust,ignore
//! use deepseek_client::{DeepSeekClient, Message};
//!
//! let client = DeepSeekClient::from_env()?;
//! let text = client
//!     .complete(vec![Message::user("Hello!")], 0.7)
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{DeepSeekError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Pure DeepSeek API client.
#[derive(Clone)]
pub struct DeepSeekClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl DeepSeekClient {
    /// Create a new DeepSeek client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.deepseek.com/v1".to_string(),
        }
    }

    /// Create from environment variable `DEEPSEEK_API_KEY`.
    ///
    /// A missing key is a configuration error, never silently defaulted.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY")
            .map_err(|_| DeepSeekError::Config("DEEPSEEK_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies or compatible endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "DeepSeek request failed");
                DeepSeekError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "DeepSeek API error");
            return Err(DeepSeekError::Api(format!(
                "DeepSeek API error {}: {}",
                status, error_text
            )));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| DeepSeekError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| DeepSeekError::Api("No response from DeepSeek".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "DeepSeek chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// Convenience helper: send role/content messages with a temperature
    /// and return just the response text.
    pub async fn complete(&self, messages: Vec<Message>, temperature: f32) -> Result<String> {
        let request = ChatRequest::new(DEFAULT_MODEL)
            .temperature(temperature)
            .max_tokens(2000);
        let request = messages
            .into_iter()
            .fold(request, |req, msg| req.message(msg));
        Ok(self.chat_completion(request).await?.content)
    }
}
