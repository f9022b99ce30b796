//! Server configuration from the environment.

use anyhow::{Context, Result};

/// Runtime configuration.
///
/// Secrets are never defaulted: a missing required variable fails
/// startup instead of silently falling back.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port.
    pub port: u16,
    /// Shared bearer token required on every `/api` request.
    pub session_token: String,
    /// DeepSeek key for the analysis/email/contact flows.
    pub deepseek_api_key: String,
    /// Optional key for the alternate-model lead-enrich endpoint; when
    /// absent that endpoint reports the missing key to the caller.
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(value) => value.parse().context("PORT must be a number")?,
            Err(_) => 4000,
        };

        let session_token =
            std::env::var("SESSION_TOKEN").context("SESSION_TOKEN must be set")?;
        let deepseek_api_key =
            std::env::var("DEEPSEEK_API_KEY").context("DEEPSEEK_API_KEY must be set")?;
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            port,
            session_token,
            deepseek_api_key,
            openai_api_key,
        })
    }
}
