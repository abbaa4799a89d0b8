//! OpenAI chat-completions adapter.
//!
//! Any service that speaks the OpenAI wire format (OpenAI itself, Groq,
//! Together.ai, an OpenAI-compatible proxy) works by pointing `base_url` at it.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::http::{non_empty_str, send_json};
use super::{require, ProviderError, TextProvider, TEMPERATURE};
use crate::prompt::Prompt;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

/// `[system, user]` chat messages, shared with the FastAPI adapter.
pub(crate) fn chat_messages(prompt: &Prompt) -> Value {
    json!([
        { "role": "system", "content": prompt.system },
        { "role": "user",   "content": prompt.user   }
    ])
}

/// `choices[0].message.content`, trimmed.
pub(crate) fn chat_completion_text(json: &Value) -> Option<String> {
    non_empty_str(&json["choices"][0]["message"]["content"])
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        require(&self.api_key, "OpenAI API key")?;

        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = json!({
            "model":       self.model,
            "messages":    chat_messages(prompt),
            "temperature": TEMPERATURE
        });

        let request = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.trim())
            .json(&body);
        let json = send_json(request, &url).await?;

        if let Some(text) = chat_completion_text(&json) {
            return Ok(text);
        }

        // Moderation withholds the content but still answers 200.
        if json["choices"][0]["finish_reason"].as_str() == Some("content_filter") {
            return Err(ProviderError::Server {
                status: None,
                message: "content_filter: response flagged by OpenAI".into(),
            });
        }

        Err(ProviderError::InvalidResponse(
            "missing choices[0].message.content".into(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::build_client;
    use crate::retry::{classify, ErrorKind};
    use mockito::Matcher;
    use std::time::Duration;

    fn prompt() -> Prompt {
        Prompt {
            system: "Test system".into(),
            user: "Test user".into(),
        }
    }

    fn provider(base_url: &str, key: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            build_client(Duration::from_secs(5)),
            base_url,
            "gpt-4o-mini",
            key,
        )
    }

    #[tokio::test]
    async fn sends_chat_body_and_reads_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "temperature": 0.3,
                "messages": [
                    { "role": "system", "content": "Test system" },
                    { "role": "user",   "content": "Test user" }
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"  Corrected text here \n"}}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url(), "test-key")
            .complete(&prompt())
            .await
            .unwrap();

        assert_eq!(text, "Corrected text here");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_key_fails_without_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = provider(&server.url(), "")
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ProviderError::MissingCredential("OpenAI API key".into())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_500_is_server_error_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("The server had an error while processing your request")
            .create_async()
            .await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err
            .to_string()
            .contains("The server had an error while processing your request"));
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn filtered_choice_is_reported_as_content_filter() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#;
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.status(), None);
        assert_eq!(classify(&err, "OpenAI").kind, ErrorKind::ContentFiltered);
    }
}
