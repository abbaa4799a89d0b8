//! Provider selection.
//!
//! [`ProviderRouter`] owns the shared HTTP client and turns a settings +
//! secrets snapshot into the matching [`TextProvider`].  It holds no other
//! state, so one router can serve any number of concurrent requests.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;

use super::http::build_client;
use super::{
    ClaudeProvider, FastApiProvider, GeminiProvider, OllamaProvider, OpenAiProvider,
    ProviderError, TextProvider,
};
use crate::config::{ProviderSettings, Secrets};
use crate::prompt::Prompt;

// ---------------------------------------------------------------------------
// ProviderKind
// ---------------------------------------------------------------------------

/// The supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Claude,
    FastApi,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAi,
        ProviderKind::Gemini,
        ProviderKind::Claude,
        ProviderKind::FastApi,
        ProviderKind::Ollama,
    ];

    /// Settings identifier (`"openai"`, `"gemini"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Claude => "claude",
            ProviderKind::FastApi => "fastapi",
            ProviderKind::Ollama => "ollama",
        }
    }

    /// Name interpolated into user-facing messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Google Gemini",
            ProviderKind::Claude => "Anthropic Claude",
            ProviderKind::FastApi => "FastAPI",
            ProviderKind::Ollama => "Ollama",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| ProviderError::Unsupported(s.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// ProviderRouter
// ---------------------------------------------------------------------------

pub struct ProviderRouter {
    client: Client,
}

impl ProviderRouter {
    /// Router whose requests each carry a `timeout` deadline.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
        }
    }

    /// Build the adapter for `settings.provider` with its credential subset.
    pub fn adapter(
        &self,
        settings: &ProviderSettings,
        secrets: &Secrets,
    ) -> Result<Box<dyn TextProvider>, ProviderError> {
        let kind: ProviderKind = settings.provider.parse()?;
        let client = self.client.clone();

        let adapter: Box<dyn TextProvider> = match kind {
            ProviderKind::OpenAi => Box::new(OpenAiProvider::new(
                client,
                &settings.openai_base_url,
                &settings.openai_model,
                &secrets.openai_key,
            )),
            ProviderKind::Gemini => Box::new(GeminiProvider::new(
                client,
                &settings.gemini_base_url,
                &settings.gemini_model,
                &secrets.gemini_key,
            )),
            ProviderKind::Claude => Box::new(ClaudeProvider::new(
                client,
                &settings.claude_base_url,
                &settings.claude_model,
                &secrets.claude_key,
            )),
            ProviderKind::FastApi => {
                Box::new(FastApiProvider::new(client, &settings.fastapi_endpoint))
            }
            ProviderKind::Ollama => Box::new(OllamaProvider::new(
                client,
                &settings.ollama_endpoint,
                &settings.ollama_model,
            )),
        };
        Ok(adapter)
    }

    /// Dispatch `prompt` to the configured provider (single attempt).
    pub async fn run(
        &self,
        prompt: &Prompt,
        settings: &ProviderSettings,
        secrets: &Secrets,
    ) -> Result<String, ProviderError> {
        self.adapter(settings, secrets)?.complete(prompt).await
    }
}
