//! Request, result and error types of a correction.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompt::Tone;
use crate::provider::ProviderError;
use crate::retry::{Classification, ErrorKind};

/// What the user asked for: the per-action part of the prompt options.
///
/// Markdown, custom prompt and dictionary come from settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionRequest {
    pub tone: Tone,
    pub bulletize: bool,
    pub summarize: bool,
}

impl CorrectionRequest {
    pub fn with_tone(tone: Tone) -> Self {
        Self {
            tone,
            ..Self::default()
        }
    }

    /// Short label for logs.
    pub fn mode(&self) -> &'static str {
        if self.summarize {
            "summarize"
        } else if self.bulletize {
            "bulletize"
        } else {
            "correct"
        }
    }
}

/// Where the text came from.  Carried through untouched for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionSource {
    ManualEntry,
    FocusedField,
    Clipboard,
    Service,
}

impl fmt::Display for CorrectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CorrectionSource::ManualEntry => "manual entry",
            CorrectionSource::FocusedField => "focused field",
            CorrectionSource::Clipboard => "clipboard",
            CorrectionSource::Service => "service",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionResult {
    pub original_text: String,
    pub corrected_text: String,
    pub source: CorrectionSource,
}

impl CorrectionResult {
    pub fn changed(&self) -> bool {
        self.original_text.trim() != self.corrected_text.trim()
    }
}

/// A failed correction: classified kind, user-facing message and the
/// structured provider failure behind it (absent for rejected input).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CorrectionError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<ProviderError>,
}

impl CorrectionError {
    pub fn empty_input() -> Self {
        let Classification { kind, message } = Classification::new(ErrorKind::EmptyInput, "", "");
        Self {
            kind,
            message,
            source: None,
        }
    }

    pub(crate) fn from_provider(error: ProviderError, classification: Classification) -> Self {
        Self {
            kind: classification.kind,
            message: classification.message,
            source: Some(error),
        }
    }
}
