//! AI enrichment: completion-service contracts, prompt construction,
//! lenient response parsing, and the orchestrator that merges results
//! back into leads and companies.

pub mod contacts;
pub mod contracts;
pub mod orchestrator;
pub mod parse;
pub mod prompts;

pub use contacts::ContactSearcher;
pub use contracts::{
    CompanyAnalysis, CompanyProfile, ContactReport, DiscoveredContact, EmailDraft, LeadAnalysis,
    ServiceDetails, ServiceSuggestion,
};
pub use orchestrator::EnrichmentOrchestrator;
pub use parse::{parse_json_or, strip_code_fences};

use async_trait::async_trait;
use deepseek_client::{DeepSeekClient, Message};

use crate::error::{Result, ScrapeError};

/// Seam over the chat-completion service.
///
/// The request shape is an ordered message list plus a temperature; the
/// response is one text blob expected to contain JSON, possibly fenced.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: Vec<Message>, temperature: f32) -> Result<String>;
}

#[async_trait]
impl ChatCompletion for DeepSeekClient {
    async fn complete(&self, messages: Vec<Message>, temperature: f32) -> Result<String> {
        DeepSeekClient::complete(self, messages, temperature)
            .await
            .map_err(|e| ScrapeError::Ai(e.to_string()))
    }
}
