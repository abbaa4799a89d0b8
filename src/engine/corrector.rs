//! `CorrectionEngine`: build prompt → pick adapter → retry → classify.
//!
//! Stateless apart from the shared HTTP client, so one engine serves every
//! correction.  Settings and secrets are passed per call as one snapshot.

use crate::config::{AppConfig, Secrets};
use crate::prompt::{self, PromptOptions};
use crate::provider::{ProviderError, ProviderKind, ProviderRouter, TextProvider};
use crate::retry::{classify, RetryPolicy};

use super::types::{CorrectionError, CorrectionRequest, CorrectionResult, CorrectionSource};

pub struct CorrectionEngine {
    router: ProviderRouter,
    retry: RetryPolicy,
}

impl CorrectionEngine {
    pub fn new(router: ProviderRouter, retry: RetryPolicy) -> Self {
        Self { router, retry }
    }

    /// Engine with the configured request deadline and retry budget.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ProviderRouter::new(config.provider.timeout()),
            RetryPolicy::from(&config.retry),
        )
    }

    /// Correct `text` with the provider selected in `config`.
    ///
    /// Whitespace-only text is rejected before any I/O.  Every failure comes
    /// back classified; nothing is swallowed.
    pub async fn correct(
        &self,
        text: &str,
        request: &CorrectionRequest,
        source: CorrectionSource,
        config: &AppConfig,
        secrets: &Secrets,
    ) -> Result<CorrectionResult, CorrectionError> {
        if text.trim().is_empty() {
            return Err(CorrectionError::empty_input());
        }

        let settings = &config.provider;
        let display_name = settings
            .provider
            .parse::<ProviderKind>()
            .map(ProviderKind::display_name)
            .unwrap_or(settings.provider.as_str());

        log::info!(
            "Correcting {} chars from {source} via {display_name} (tone: {}, mode: {})",
            text.chars().count(),
            request.tone.display_name(),
            request.mode()
        );

        let correction = &config.correction;
        let options = PromptOptions {
            tone: request.tone,
            bulletize: request.bulletize,
            summarize: request.summarize,
            use_markdown: correction.use_markdown,
            custom_system_prompt: correction.custom_system_prompt.clone(),
            custom_dictionary: correction.custom_dictionary.clone(),
        };
        let prompt = prompt::build(text, &options);

        let outcome = match self.router.adapter(settings, secrets) {
            Ok(adapter) => {
                let adapter: &dyn TextProvider = adapter.as_ref();
                let prompt = &prompt;
                self.retry.run(|| adapter.complete(prompt)).await
            }
            Err(e) => Err(e),
        };

        outcome
            .map(|corrected_text| CorrectionResult {
                original_text: text.to_string(),
                corrected_text,
                source,
            })
            .map_err(|e| self.fail(e, display_name))
    }

    fn fail(&self, error: ProviderError, display_name: &str) -> CorrectionError {
        let classification = classify(&error, display_name);
        log::warn!(
            "Correction via {display_name} failed [{}]: {error:?}",
            classification.kind
        );
        CorrectionError::from_provider(error, classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderSettings;
    use crate::prompt::{DictionaryEntry, Tone};
    use crate::retry::ErrorKind;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn engine() -> CorrectionEngine {
        CorrectionEngine::new(
            ProviderRouter::new(Duration::from_secs(5)),
            RetryPolicy {
                max_retries: 2,
                base_delay: Duration::ZERO,
            },
        )
    }

    fn openai_config(base_url: &str) -> AppConfig {
        AppConfig {
            provider: ProviderSettings {
                provider: "openai".into(),
                openai_base_url: base_url.into(),
                ..ProviderSettings::default()
            },
            ..AppConfig::default()
        }
    }

    fn secrets() -> Secrets {
        Secrets {
            openai_key: "sk-test".into(),
            ..Secrets::default()
        }
    }

    #[tokio::test]
    async fn corrects_text_and_keeps_source() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("professional tone".into()),
                Matcher::Regex("ALWAYS preserve these terms".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"  I have a question.  "}}]}"#)
            .create_async()
            .await;

        let mut config = openai_config(&server.url());
        config.correction.custom_dictionary = vec![DictionaryEntry::preserve("TypeMagic")];

        let result = engine()
            .correct(
                "i has a question",
                &CorrectionRequest::with_tone(Tone::Professional),
                CorrectionSource::Clipboard,
                &config,
                &secrets(),
            )
            .await
            .unwrap();

        assert_eq!(result.original_text, "i has a question");
        assert_eq!(result.corrected_text, "I have a question.");
        assert_eq!(result.source, CorrectionSource::Clipboard);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn blank_input_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = engine()
            .correct(
                " \n\t ",
                &CorrectionRequest::default(),
                CorrectionSource::ManualEntry,
                &openai_config(&server.url()),
                &secrets(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::EmptyInput);
        assert!(err.source.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_key_is_classified_without_request() {
        let err = engine()
            .correct(
                "hello",
                &CorrectionRequest::default(),
                CorrectionSource::Service,
                &openai_config("http://127.0.0.1:9"),
                &Secrets::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::MissingCredential);
        assert_eq!(
            err.source,
            Some(ProviderError::MissingCredential("OpenAI API key".into()))
        );
    }

    #[tokio::test]
    async fn unknown_provider_is_reported() {
        let mut config = AppConfig::default();
        config.provider.provider = "mistral".into();

        let err = engine()
            .correct(
                "hello",
                &CorrectionRequest::default(),
                CorrectionSource::Service,
                &config,
                &secrets(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::UnsupportedProvider);
    }

    #[tokio::test]
    async fn persistent_server_errors_are_retried_then_classified() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let err = engine()
            .correct(
                "hello",
                &CorrectionRequest::default(),
                CorrectionSource::Service,
                &openai_config(&server.url()),
                &secrets(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "OpenAI server error. Try again in a moment.");
        assert_eq!(
            err.source.as_ref().and_then(ProviderError::status),
            Some(503)
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_key_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"code":"invalid_api_key"}}"#)
            .expect(1)
            .create_async()
            .await;

        let err = engine()
            .correct(
                "hello",
                &CorrectionRequest::default(),
                CorrectionSource::Service,
                &openai_config(&server.url()),
                &secrets(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InvalidCredential);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn summarize_goes_through_ollama() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({ "model": "llama3.2", "stream": false })),
                Matcher::Regex("concise summary".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"response":"Short summary."}"#)
            .create_async()
            .await;

        let mut config = AppConfig::default();
        config.provider.provider = "ollama".into();
        config.provider.ollama_endpoint = server.url();

        let request = CorrectionRequest {
            summarize: true,
            ..CorrectionRequest::default()
        };
        let result = engine()
            .correct(
                "A long text.",
                &request,
                CorrectionSource::FocusedField,
                &config,
                &Secrets::default(),
            )
            .await
            .unwrap();

        assert_eq!(result.corrected_text, "Short summary.");
        mock.assert_async().await;
    }
}
