//! Anthropic Messages API adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::http::{non_empty_str, send_json};
use super::{require, ProviderError, TextProvider, MAX_TOKENS, TEMPERATURE};
use crate::prompt::Prompt;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

pub struct ClaudeProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ClaudeProvider {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.trim().to_string(),
        }
    }
}

/// First `text` content block, skipping any non-text blocks.
fn first_text_block(json: &Value) -> Option<String> {
    json["content"]
        .as_array()?
        .iter()
        .filter(|block| block["type"].as_str().map_or(true, |t| t == "text"))
        .find_map(|block| non_empty_str(&block["text"]))
}

#[async_trait]
impl TextProvider for ClaudeProvider {
    fn name(&self) -> &'static str {
        "claude"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        require(&self.api_key, "Claude API key")?;

        let url = format!("{}/v1/messages", self.base_url);
        let body = json!({
            "model":       self.model,
            "max_tokens":  MAX_TOKENS,
            "system":      prompt.system,
            "messages":    [{ "role": "user", "content": prompt.user }],
            "temperature": TEMPERATURE
        });

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body);
        let json = send_json(request, &url).await?;

        first_text_block(&json)
            .ok_or_else(|| ProviderError::InvalidResponse("missing text content block".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::build_client;
    use mockito::Matcher;
    use std::time::Duration;

    fn prompt() -> Prompt {
        Prompt {
            system: "Sys".into(),
            user: "txt".into(),
        }
    }

    fn provider(base_url: &str, key: &str) -> ClaudeProvider {
        ClaudeProvider::new(
            build_client(Duration::from_secs(5)),
            base_url,
            "claude-3-5-sonnet-20241022",
            key,
        )
    }

    #[tokio::test]
    async fn sends_system_field_and_version_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "c-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-5-sonnet-20241022",
                "max_tokens": 4096,
                "system": "Sys",
                "messages": [{ "role": "user", "content": "txt" }],
                "temperature": 0.3
            })))
            .with_status(200)
            .with_body(r#"{"content":[{"type":"text","text":" fixed "}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url(), "c-key")
            .complete(&prompt())
            .await
            .unwrap();

        assert_eq!(text, "fixed");
        mock.assert_async().await;
    }

    #[test]
    fn skips_non_text_blocks() {
        let json = json!({
            "content": [
                { "type": "thinking", "thinking": "hmm" },
                { "type": "text", "text": "answer" }
            ]
        });
        assert_eq!(first_text_block(&json), Some("answer".into()));
        assert_eq!(first_text_block(&json!({ "content": [] })), None);
    }

    #[tokio::test]
    async fn http_401_keeps_status() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(body)
            .create_async()
            .await;

        let err = provider(&server.url(), "bad")
            .complete(&prompt())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(
            err.to_string(),
            "HTTP 401: invalid x-api-key (authentication_error)"
        );
    }

    #[tokio::test]
    async fn http_500_is_server_error_with_body() {
        let body = r#"{"type":"error","error":{"type":"api_error","message":"Internal server error"}}"#;
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .with_body(body)
            .create_async()
            .await;

        let err = provider(&server.url(), "c-key")
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(matches!(err, ProviderError::Server { .. }));
        assert!(err.to_string().contains("Internal server error"));
    }
}
