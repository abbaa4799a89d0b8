//! API keys, kept out of `settings.toml`.
//!
//! Stored as `secrets.toml` next to the settings file (mode `0600` on Unix).
//! Non-empty `OPENAI_API_KEY`, `GEMINI_API_KEY` and `ANTHROPIC_API_KEY`
//! environment variables take precedence over the file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

pub const OPENAI_ENV: &str = "OPENAI_API_KEY";
pub const GEMINI_ENV: &str = "GEMINI_API_KEY";
pub const CLAUDE_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secrets {
    pub openai_key: String,
    pub gemini_key: String,
    pub claude_key: String,
}

// Keys must never end up in logs.
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(key: &str) -> &'static str {
            if key.is_empty() {
                "<empty>"
            } else {
                "<set>"
            }
        }
        f.debug_struct("Secrets")
            .field("openai_key", &mask(&self.openai_key))
            .field("gemini_key", &mask(&self.gemini_key))
            .field("claude_key", &mask(&self.claude_key))
            .finish()
    }
}

impl Secrets {
    /// Load `secrets.toml` from the config directory, then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut secrets = Self::load_from(&AppPaths::new().secrets_file)?;
        secrets.apply_overrides(|name| std::env::var(name).ok());
        Ok(secrets)
    }

    /// Load from an explicit path without env overrides.  A missing file
    /// yields empty keys.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().secrets_file)
    }

    /// Write to `path`, restricting permissions to the owner on Unix.
    ///
    /// A new file is created with mode `0600`; an existing one is narrowed to
    /// `0600` before it is rewritten.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(0o600);
            if path.exists() {
                std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
            }
        }

        let mut file = options.open(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Replace keys with non-blank values returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let slots = [
            (OPENAI_ENV, &mut self.openai_key),
            (GEMINI_ENV, &mut self.gemini_key),
            (CLAUDE_ENV, &mut self.claude_key),
        ];
        for (name, slot) in slots {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                log::debug!("Using {name} from the environment");
                *slot = value.trim().to_string();
            }
        }
    }
}
