//! Self-hosted, FastAPI-compatible endpoint adapter.
//!
//! The server contract is open: requests use the OpenAI chat shape without a
//! model or auth, and the response text is looked up under several field
//! names.  The lookup order below is a compatibility heuristic carried over
//! from existing deployments, not a guaranteed contract:
//!
//! 1. `corrected_text`
//! 2. `text`
//! 3. `result`
//! 4. `choices[0].message.content`
//! 5. `content`
//! 6. `response`

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::http::{non_empty_str, send_json};
use super::openai::{chat_completion_text, chat_messages};
use super::{require, ProviderError, TextProvider, MAX_TOKENS, TEMPERATURE};
use crate::prompt::Prompt;

/// Path appended to bare base URLs.
pub const CANONICAL_PATH: &str = "/v1/chat/completions";

/// Path fragments that mark an endpoint as already complete.
const KNOWN_PATHS: [&str; 3] = ["/v1/chat/completions", "/correct", "/api/"];

/// Append [`CANONICAL_PATH`] unless `endpoint` already names a known path.
///
/// ```rust
/// use typemagic::provider::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("http://host:8000/"), "http://host:8000/v1/chat/completions");
/// assert_eq!(normalize_endpoint("http://host:8000/correct"), "http://host:8000/correct");
/// ```
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if KNOWN_PATHS.iter().any(|p| endpoint.contains(p)) {
        endpoint.to_string()
    } else {
        format!("{}{}", endpoint.trim_end_matches('/'), CANONICAL_PATH)
    }
}

/// Pick the corrected text out of an arbitrary JSON body.
///
/// Errors list the top-level keys that were present.
pub fn extract_text(json: &Value) -> Result<String, ProviderError> {
    let found = non_empty_str(&json["corrected_text"])
        .or_else(|| non_empty_str(&json["text"]))
        .or_else(|| non_empty_str(&json["result"]))
        .or_else(|| chat_completion_text(json))
        .or_else(|| non_empty_str(&json["content"]))
        .or_else(|| non_empty_str(&json["response"]));

    found.ok_or_else(|| {
        let keys: Vec<&str> = json
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let keys = if keys.is_empty() {
            "(none)".to_string()
        } else {
            keys.join(", ")
        };
        ProviderError::InvalidResponse(format!("response missing text field. Got keys: {keys}"))
    })
}

pub struct FastApiProvider {
    client: Client,
    endpoint: String,
}

impl FastApiProvider {
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl TextProvider for FastApiProvider {
    fn name(&self) -> &'static str {
        "fastapi"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        require(&self.endpoint, "FastAPI endpoint")?;

        let url = normalize_endpoint(&self.endpoint);
        log::debug!("Calling FastAPI endpoint {url}");

        let body = json!({
            "messages":    chat_messages(prompt),
            "temperature": TEMPERATURE,
            "max_tokens":  MAX_TOKENS
        });

        let json = send_json(self.client.post(&url).json(&body), &url).await?;
        extract_text(&json)
    }
}
