//! Client error taxonomy.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeepSeekError>;

/// Everything that can go wrong talking to the completion API, split
/// by where the failure happened: before the request (config), on the
/// wire (network), at the API (non-2xx or empty choices), or decoding
/// the body (parse).
#[derive(Debug, Error)]
pub enum DeepSeekError {
    #[error("deepseek config: {0}")]
    Config(String),

    #[error("deepseek request failed: {0}")]
    Network(String),

    #[error("deepseek api: {0}")]
    Api(String),

    #[error("deepseek response body: {0}")]
    Parse(String),
}
