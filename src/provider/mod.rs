//! Provider adapters: one [`TextProvider`] implementation per backend.
//!
//! | Provider  | Adapter            | Endpoint                                   | Auth            |
//! |-----------|--------------------|--------------------------------------------|-----------------|
//! | OpenAI    | [`OpenAiProvider`] | `/v1/chat/completions`                     | Bearer token    |
//! | Gemini    | [`GeminiProvider`] | `/v1beta/models/{model}:generateContent`   | `key` query     |
//! | Claude    | [`ClaudeProvider`] | `/v1/messages`                             | `x-api-key`     |
//! | FastAPI   | [`FastApiProvider`]| user-supplied (normalized)                 | none            |
//! | Ollama    | [`OllamaProvider`] | `/api/generate`                            | none            |
//!
//! All adapters share the request/response plumbing in [`http`], so status
//! checks, body truncation and transport error mapping live in one place.

pub mod claude;
pub mod fastapi;
pub mod gemini;
pub mod http;
pub mod ollama;
pub mod openai;
pub mod router;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::Prompt;

pub use claude::ClaudeProvider;
pub use fastapi::{normalize_endpoint, FastApiProvider};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use router::{ProviderKind, ProviderRouter};

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f64 = 0.3;

/// Output token cap for providers that require or accept one.
pub const MAX_TOKENS: u32 = 4096;

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Failure of a single provider call.
///
/// Adapters return the most specific variant they can determine from the
/// HTTP layer; [`crate::retry`] decides retries and display text from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The configured provider name is not one of the known backends.
    #[error("unsupported provider: {0}")]
    Unsupported(String),

    /// A required API key or endpoint is empty. No request was sent.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The provider answered 2xx but the body had no usable text.
    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),

    /// Non-2xx HTTP status, or an error message reported by the provider.
    ///
    /// `status` is `None` when the provider only produced a message string.
    #[error("{message}")]
    Server { status: Option<u16>, message: String },

    /// The request never produced an HTTP response (DNS, refused, reset).
    #[error("{0}")]
    Network(String),

    /// The per-attempt deadline elapsed.
    #[error("request timed out")]
    Timeout,
}

impl ProviderError {
    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Server { status, .. } => *status,
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TextProvider
// ---------------------------------------------------------------------------

/// A text-generation backend that turns a [`Prompt`] into corrected text.
///
/// Implementors must be `Send + Sync` so a boxed adapter can be driven from
/// any tokio task.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Short backend identifier used in logs.
    fn name(&self) -> &'static str;

    /// Send `prompt` and return the trimmed, non-empty corrected text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError>;
}

/// Fail with [`ProviderError::MissingCredential`] when `value` is blank.
pub(crate) fn require(value: &str, field: &str) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        Err(ProviderError::MissingCredential(field.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_displays_its_message() {
        let err = ProviderError::Server {
            status: Some(500),
            message: "HTTP 500: boom".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn require_rejects_blank_values() {
        assert_eq!(
            require("  ", "OpenAI API key"),
            Err(ProviderError::MissingCredential("OpenAI API key".into()))
        );
        assert!(require("sk-1", "OpenAI API key").is_ok());
    }

    #[test]
    fn boxed_provider_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<Box<dyn TextProvider>>();
    }
}
