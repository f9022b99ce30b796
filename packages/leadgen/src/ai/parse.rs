//! Lenient parsing of completion-service responses.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Strip a markdown code-fence wrapper from a response, if present.
///
/// Models regularly wrap their JSON in ```` ```json ... ``` ````
/// despite being told not to.
pub fn strip_code_fences(response: &str) -> String {
    response
        .replace("```json\n", "")
        .replace("```json", "")
        .replace("\n```", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse a response as JSON, degrading to `fallback` on failure.
///
/// A raw parse error never reaches the caller; the orchestrator always
/// hands back a payload of the expected shape.
pub fn parse_json_or<T, F>(response: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let cleaned = strip_code_fences(response);
    match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "completion response was not valid JSON, using fallback");
            fallback()
        }
    }
}
