//! User-defined custom dictionary and its prompt rule renderer.
//!
//! Entries are partitioned into three groups by [`DictionaryAction`] and each
//! non-empty group becomes one numbered rule line:
//!
//! ```text
//! CUSTOM DICTIONARY RULES:
//! 1. ALWAYS preserve these terms exactly as written (...): Kubernetes, gRPC
//! 2. IGNORE these terms completely (...): lol
//! 3. ALWAYS replace these terms: "teh" → "the"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the model should do with a dictionary term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryAction {
    /// Keep the term exactly as written.
    Preserve,
    /// Never flag or touch the term.
    Ignore,
    /// Swap the term for [`DictionaryEntry::replacement`].
    Replace,
}

/// A single custom dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub term: String,
    pub action: DictionaryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("dictionary term is empty")]
    EmptyTerm,

    #[error("replace entry for {0:?} has no replacement")]
    MissingReplacement(String),
}

impl DictionaryEntry {
    pub fn preserve(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            action: DictionaryAction::Preserve,
            replacement: None,
        }
    }

    pub fn ignore(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            action: DictionaryAction::Ignore,
            replacement: None,
        }
    }

    pub fn replace(term: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            action: DictionaryAction::Replace,
            replacement: Some(replacement.into()),
        }
    }

    /// Check the entry invariants: a non-blank term, and a non-blank
    /// replacement for `replace` entries.
    pub fn validate(&self) -> Result<(), DictionaryError> {
        if self.term.trim().is_empty() {
            return Err(DictionaryError::EmptyTerm);
        }
        if self.action == DictionaryAction::Replace && self.replacement_text().is_none() {
            return Err(DictionaryError::MissingReplacement(self.term.clone()));
        }
        Ok(())
    }

    fn replacement_text(&self) -> Option<&str> {
        self.replacement
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const HEADER: &str = "\n\nCUSTOM DICTIONARY RULES:\n";

/// Render the dictionary rule block, or `None` when no valid entry exists.
///
/// Invalid entries are skipped (and logged) rather than failing the whole
/// prompt.
pub fn render_rules(entries: &[DictionaryEntry]) -> Option<String> {
    let mut preserve = Vec::new();
    let mut ignore = Vec::new();
    let mut replace = Vec::new();

    for entry in entries {
        if let Err(e) = entry.validate() {
            log::warn!("Skipping custom dictionary entry: {e}");
            continue;
        }
        let term = entry.term.trim();
        match entry.action {
            DictionaryAction::Preserve => preserve.push(term.to_string()),
            DictionaryAction::Ignore => ignore.push(term.to_string()),
            DictionaryAction::Replace => {
                // validate() guarantees a replacement here
                if let Some(with) = entry.replacement_text() {
                    replace.push(format!("\"{term}\" → \"{with}\""));
                }
            }
        }
    }

    let mut rules = Vec::with_capacity(3);
    if !preserve.is_empty() {
        rules.push(format!(
            "ALWAYS preserve these terms exactly as written (do not change capitalization or spelling): {}",
            preserve.join(", ")
        ));
    }
    if !ignore.is_empty() {
        rules.push(format!(
            "IGNORE these terms completely (do not flag as errors or modify): {}",
            ignore.join(", ")
        ));
    }
    if !replace.is_empty() {
        rules.push(format!(
            "ALWAYS replace these terms: {}",
            replace.join(", ")
        ));
    }

    if rules.is_empty() {
        return None;
    }

    let body = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect::<Vec<_>>()
        .join("\n");
    Some(format!("{HEADER}{body}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
