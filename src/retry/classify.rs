//! Final-error classification for display.
//!
//! Runs once, on the error left over after retries.  Structured variants map
//! straight to their kind; `Server` errors go through phrase matching, then
//! the HTTP status, then a loose substring pass over the message.
//!
//! ```text
//! Unsupported        ─▶ UnsupportedProvider
//! MissingCredential  ─▶ MissingCredential
//! InvalidResponse    ─▶ InvalidResponse
//! Network            ─▶ Network      (adapter text kept, it names likely causes)
//! Timeout            ─▶ Timeout
//! Server             ─▶ Quota / ModelNotFound / ContentFiltered
//!                       ─▶ by status ─▶ by text ─▶ Unknown (raw, truncated)
//! ```

use std::fmt;

use crate::provider::http::truncate;
use crate::provider::ProviderError;

/// Length cap for raw messages surfaced through [`ErrorKind::Unknown`].
pub const RAW_MESSAGE_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    MissingCredential,
    InvalidCredential,
    RateLimited,
    Server,
    Timeout,
    QuotaExceeded,
    ModelNotFound,
    ContentFiltered,
    UnsupportedProvider,
    InvalidResponse,
    EmptyInput,
    Unknown,
}

impl ErrorKind {
    /// Stable upper-case code, e.g. for logs and scripting.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::MissingCredential => "API_KEY_MISSING",
            ErrorKind::InvalidCredential => "API_KEY_INVALID",
            ErrorKind::RateLimited => "RATE_LIMITED",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::QuotaExceeded => "QUOTA_EXCEEDED",
            ErrorKind::ModelNotFound => "MODEL_NOT_FOUND",
            ErrorKind::ContentFiltered => "CONTENT_FILTERED",
            ErrorKind::UnsupportedProvider => "UNSUPPORTED_PROVIDER",
            ErrorKind::InvalidResponse => "INVALID_RESPONSE",
            ErrorKind::EmptyInput => "EMPTY_INPUT",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// Fixed user-facing text for kinds that have one.
    ///
    /// `Network`, `Server`, `MissingCredential` and `Unknown` depend on the
    /// error or provider and are built in [`classify`].
    fn fixed_message(self) -> Option<&'static str> {
        Some(match self {
            ErrorKind::InvalidCredential => "Invalid API key. Please check your key in Settings.",
            ErrorKind::RateLimited => "Rate limited. Please wait a moment and try again.",
            ErrorKind::Timeout => "Request timed out. Try again or use a faster model.",
            ErrorKind::QuotaExceeded => {
                "API quota exceeded. Check your billing or try a different provider."
            }
            ErrorKind::ModelNotFound => "Model not found. Check your model name in Settings.",
            ErrorKind::ContentFiltered => "Content was filtered by the AI provider.",
            ErrorKind::UnsupportedProvider => {
                "Invalid provider selected. Please choose a provider in Settings."
            }
            ErrorKind::InvalidResponse => {
                "The AI provider returned an unexpected response. Try again or switch models."
            }
            ErrorKind::EmptyInput => "Nothing to correct. Select or enter some text first.",
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind plus the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ErrorKind,
    pub message: String,
}

impl Classification {
    pub fn new(kind: ErrorKind, provider_name: &str, raw: &str) -> Self {
        let message = match kind {
            ErrorKind::Network => raw.to_string(),
            ErrorKind::Server => format!("{provider_name} server error. Try again in a moment."),
            ErrorKind::MissingCredential => missing_credential_message(raw),
            ErrorKind::Unknown => truncate(raw, RAW_MESSAGE_LIMIT),
            other => other.fixed_message().unwrap_or_default().to_string(),
        };
        Self { kind, message }
    }
}

fn missing_credential_message(field: &str) -> String {
    if field.is_empty() || field.contains("API key") {
        "API key not configured. Open Settings to add your key.".to_string()
    } else {
        format!("{field} not configured. Open Settings to set it.")
    }
}

/// Classify the final error of a correction for display.
///
/// `provider_name` is the display name interpolated into server errors.
pub fn classify(error: &ProviderError, provider_name: &str) -> Classification {
    let kind = match error {
        ProviderError::Unsupported(_) => ErrorKind::UnsupportedProvider,
        ProviderError::MissingCredential(field) => {
            return Classification::new(ErrorKind::MissingCredential, provider_name, field)
        }
        ProviderError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        ProviderError::Network(message) => {
            return Classification::new(ErrorKind::Network, provider_name, message)
        }
        ProviderError::Timeout => ErrorKind::Timeout,
        ProviderError::Server { status, message } => classify_server(*status, message),
    };
    Classification::new(kind, provider_name, &error.to_string())
}

fn classify_server(status: Option<u16>, message: &str) -> ErrorKind {
    let lower = message.to_lowercase();

    // Phrases first: a 429 carrying "insufficient_quota" is a quota problem.
    if let Some(kind) = specific_phrase(&lower) {
        return kind;
    }

    match status {
        Some(401 | 403) => return ErrorKind::InvalidCredential,
        Some(404) if lower.contains("model") => return ErrorKind::ModelNotFound,
        Some(408) => return ErrorKind::Timeout,
        Some(429) => return ErrorKind::RateLimited,
        Some(500..=599) => return ErrorKind::Server,
        _ => {}
    }

    text_fallback(&lower).unwrap_or(ErrorKind::Unknown)
}

fn specific_phrase(lower: &str) -> Option<ErrorKind> {
    if lower.contains("quota") || lower.contains("billing") {
        Some(ErrorKind::QuotaExceeded)
    } else if lower.contains("model")
        && (lower.contains("not found") || lower.contains("does not exist"))
    {
        Some(ErrorKind::ModelNotFound)
    } else if lower.contains("content_filter") || lower.contains("flagged") {
        Some(ErrorKind::ContentFiltered)
    } else {
        None
    }
}

/// Last resort for status-less messages.
fn text_fallback(lower: &str) -> Option<ErrorKind> {
    if lower.contains("failed to fetch") || lower.contains("networkerror") {
        Some(ErrorKind::Network)
    } else if lower.contains("unauthorized") || lower.contains("invalid_api_key") {
        Some(ErrorKind::InvalidCredential)
    } else if lower.contains("rate_limit") || lower.contains("rate limit") {
        Some(ErrorKind::RateLimited)
    } else if lower.contains("timeout") || lower.contains("timed out") {
        Some(ErrorKind::Timeout)
    } else {
        None
    }
}
