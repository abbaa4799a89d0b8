//! Local Ollama server adapter (native `/api/generate`, non-streaming).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::http::{non_empty_str, send_json};
use super::{require, ProviderError, TextProvider, TEMPERATURE};
use crate::prompt::Prompt;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(client: Client, endpoint: &str, model: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl TextProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        require(&self.endpoint, "Ollama endpoint")?;

        let url = format!("{}/api/generate", self.endpoint);
        let body = json!({
            "model":   self.model,
            "prompt":  prompt.combined(),
            "stream":  false,
            "options": { "temperature": TEMPERATURE }
        });

        let json = send_json(self.client.post(&url).json(&body), &url)
            .await
            .map_err(|e| match e {
                ProviderError::Network(_) => ProviderError::Network(format!(
                    "Cannot connect to Ollama at {}. Make sure Ollama is running with 'ollama serve'",
                    self.endpoint
                )),
                other => other,
            })?;

        non_empty_str(&json["response"])
            .ok_or_else(|| ProviderError::InvalidResponse("missing response field".into()))
    }
}
