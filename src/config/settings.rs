//! Application settings structs, defaults and TOML persistence.
//!
//! Every section is `#[serde(default)]`, so a hand-edited `settings.toml`
//! only needs the keys it changes.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::prompt::{DictionaryEntry, Tone};
use crate::provider::{claude, gemini, ollama, openai};

// ---------------------------------------------------------------------------
// ProviderSettings
// ---------------------------------------------------------------------------

/// Provider selection plus the per-provider model and endpoint fields.
///
/// `provider` stays a plain string: an unknown value must reach the router
/// and fail there as unsupported rather than fail parsing the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// `"openai"`, `"gemini"`, `"claude"`, `"fastapi"` or `"ollama"`.
    pub provider: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub claude_model: String,
    pub claude_base_url: String,
    /// Self-hosted endpoint; a bare base URL gets `/v1/chat/completions`.
    pub fastapi_endpoint: String,
    pub ollama_endpoint: String,
    pub ollama_model: String,
    /// Per-attempt request deadline in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            openai_model: "gpt-4o-mini".into(),
            openai_base_url: openai::DEFAULT_BASE_URL.into(),
            gemini_model: "gemini-1.5-flash".into(),
            gemini_base_url: gemini::DEFAULT_BASE_URL.into(),
            claude_model: "claude-3-5-sonnet-20241022".into(),
            claude_base_url: claude::DEFAULT_BASE_URL.into(),
            fastapi_endpoint: String::new(),
            ollama_endpoint: ollama::DEFAULT_ENDPOINT.into(),
            ollama_model: "llama3.2".into(),
            timeout_secs: 30,
        }
    }
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ---------------------------------------------------------------------------
// CorrectionConfig
// ---------------------------------------------------------------------------

/// Prompt-shaping settings shared by every correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Ask providers for Markdown output instead of plain text.
    pub use_markdown: bool,
    /// Replaces the built-in instructions when non-blank.
    pub custom_system_prompt: Option<String>,
    /// Tone used by the CLI when `--tone` is not given.
    pub default_tone: Tone,
    pub custom_dictionary: Vec<DictionaryEntry>,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            use_markdown: false,
            custom_system_prompt: None,
            default_tone: Tone::Preserve,
            custom_dictionary: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RetryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first one for transient failures.
    pub max_retries: u32,
    /// Backoff unit; attempt `i` waits `(i + 1) * base_delay_ms`.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1_000,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use typemagic::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let mut config = AppConfig::load().unwrap();
/// config.provider.provider = "ollama".into();
/// config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderSettings,
    pub correction: CorrectionConfig,
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
