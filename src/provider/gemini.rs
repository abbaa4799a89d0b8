//! Google Generative Language (`generateContent`) adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::http::{non_empty_str, send_json};
use super::{require, ProviderError, TextProvider, TEMPERATURE};
use crate::prompt::Prompt;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// `finishReason` values meaning the candidate was withheld by a filter.
const BLOCKED_FINISH_REASONS: [&str; 4] =
    ["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT"];

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(client: Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.trim().to_string(),
            api_key: api_key.trim().to_string(),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        require(&self.api_key, "Gemini API key")?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt.combined() }] }],
            "generationConfig": { "temperature": TEMPERATURE }
        });

        let request = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body);
        // The key is a query parameter; keep it out of error messages.
        let json = send_json(request, &url).await?;

        let candidate = &json["candidates"][0];
        if let Some(text) = non_empty_str(&candidate["content"]["parts"][0]["text"]) {
            return Ok(text);
        }

        // A blocked prompt comes back 200 with feedback and no candidates.
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            return Err(ProviderError::Server {
                status: None,
                message: format!("content_filter: prompt blocked by Gemini ({reason})"),
            });
        }

        // A blocked answer comes back as a candidate with no text.
        if let Some(reason) = candidate["finishReason"]
            .as_str()
            .filter(|reason| BLOCKED_FINISH_REASONS.contains(reason))
        {
            return Err(ProviderError::Server {
                status: None,
                message: format!("content_filter: response blocked by Gemini ({reason})"),
            });
        }

        Err(ProviderError::InvalidResponse(
            "missing candidates[0].content.parts[0].text".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::build_client;
    use crate::retry::{classify, ErrorKind};
    use mockito::Matcher;
    use std::time::Duration;

    const PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

    fn prompt() -> Prompt {
        Prompt {
            system: "Sys".into(),
            user: "helo wrld".into(),
        }
    }

    fn provider(base_url: &str, key: &str) -> GeminiProvider {
        GeminiProvider::new(
            build_client(Duration::from_secs(5)),
            base_url,
            "gemini-1.5-flash",
            key,
        )
    }

    async fn reply(status: usize, body: &str) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;
        (server, mock)
    }

    #[tokio::test]
    async fn sends_combined_text_with_key_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [{ "text": "Sys\n\nText to correct:\nhelo wrld" }] }],
                "generationConfig": { "temperature": 0.3 }
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"hello world\n"}]}}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url(), "g-key")
            .complete(&prompt())
            .await
            .unwrap();

        assert_eq!(text, "hello world");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_key_is_reported() {
        let err = provider("http://127.0.0.1:9", "")
            .complete(&prompt())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::MissingCredential("Gemini API key".into())
        );
    }

    #[tokio::test]
    async fn blocked_prompt_is_reported_as_content_filter() {
        let (server, _m) = reply(200, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("content_filter"));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn blocked_candidate_is_reported_as_content_filter() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY","safetyRatings":[{"category":"HARM_CATEGORY_HARASSMENT","probability":"HIGH"}]}]}"#;
        let (server, _m) = reply(200, body).await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("SAFETY"));
        assert_eq!(
            classify(&err, "Google Gemini").kind,
            ErrorKind::ContentFiltered
        );
    }

    #[tokio::test]
    async fn recitation_stop_is_reported_as_content_filter() {
        let (server, _m) = reply(200, r#"{"candidates":[{"finishReason":"RECITATION"}]}"#).await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();
        assert_eq!(
            classify(&err, "Google Gemini").kind,
            ErrorKind::ContentFiltered
        );
    }

    #[tokio::test]
    async fn empty_candidate_without_block_is_invalid_response() {
        let (server, _m) = reply(200, r#"{"candidates":[{"finishReason":"STOP"}]}"#).await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn http_500_is_server_error_with_body() {
        let body = r#"{"error":{"code":500,"message":"Internal error encountered.","status":"INTERNAL"}}"#;
        let (server, _m) = reply(500, body).await;

        let err = provider(&server.url(), "k")
            .complete(&prompt())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(matches!(err, ProviderError::Server { .. }));
        assert!(err.to_string().contains("Internal error encountered."));
    }
}
