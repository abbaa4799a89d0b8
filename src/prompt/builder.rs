//! Prompt construction.
//!
//! [`build`] is a pure function: the same text and options always produce the
//! same [`Prompt`], and the user text is passed through untouched.

use serde::{Deserialize, Serialize};

use super::dictionary::{self, DictionaryEntry};
use super::templates::{self, InstructionBlock};

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

/// Stylistic correction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Fix errors only, keep the writer's voice.
    #[default]
    Preserve,
    Professional,
    Casual,
}

impl Tone {
    /// Label shown in menus and logs.
    pub fn display_name(self) -> &'static str {
        match self {
            Tone::Preserve => "Keep My Voice",
            Tone::Professional => "More Professional",
            Tone::Casual => "More Casual",
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Tone::Preserve),
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            other => Err(format!("unknown tone: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt / PromptOptions
// ---------------------------------------------------------------------------

/// System instructions plus the user text, as sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single text blob for providers without a separate system slot
    /// (Gemini, Ollama `/api/generate`).
    pub fn combined(&self) -> String {
        format!("{}\n\nText to correct:\n{}", self.system, self.user)
    }
}

/// Everything that shapes the system prompt.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub tone: Tone,
    /// Overrides the tone rules with bullet-point rules.
    pub bulletize: bool,
    /// Overrides both `bulletize` and the tone rules.
    pub summarize: bool,
    pub use_markdown: bool,
    /// Replaces the built-in instructions when non-blank.
    pub custom_system_prompt: Option<String>,
    pub custom_dictionary: Vec<DictionaryEntry>,
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// Build the prompt for `text`.
///
/// Instruction priority is `summarize` > `bulletize` > `tone`.  A non-blank
/// custom system prompt replaces the built-in text verbatim; the dictionary
/// rules are appended in both cases.
pub fn build(text: &str, options: &PromptOptions) -> Prompt {
    let custom = options
        .custom_system_prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty());

    let mut system = match custom {
        Some(prompt) => prompt.to_string(),
        None => {
            let mut base = String::from(templates::PREAMBLE);
            base.push_str(&instruction_block(options).render(options.use_markdown));
            base
        }
    };

    if let Some(rules) = dictionary::render_rules(&options.custom_dictionary) {
        system.push_str(&rules);
    }

    Prompt {
        system,
        user: text.to_string(),
    }
}

fn instruction_block(options: &PromptOptions) -> &'static InstructionBlock {
    if options.summarize {
        &templates::SUMMARIZE
    } else if options.bulletize {
        &templates::BULLETIZE
    } else {
        match options.tone {
            Tone::Preserve => &templates::PRESERVE,
            Tone::Professional => &templates::PROFESSIONAL,
            Tone::Casual => &templates::CASUAL,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
