//! Shared HTTP execution for every adapter: send, status check, body read,
//! JSON decode and text extraction helpers.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::ProviderError;

/// Maximum number of characters of an error body kept in a message.
pub const ERROR_BODY_LIMIT: usize = 200;

/// Build the shared client with a per-request deadline.
///
/// Falls back to a default client if the builder fails (should never happen
/// in practice); the deadline is then the OS socket default.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build HTTP client ({e}); using defaults");
            Client::new()
        })
}

/// Send `request` to `url` and decode a 2xx JSON body.
///
/// * transport timeout → [`ProviderError::Timeout`]
/// * no HTTP response → [`ProviderError::Network`] naming `url` and likely causes
/// * non-2xx → [`ProviderError::Server`] with the provider's error text
/// * non-JSON body → [`ProviderError::InvalidResponse`]
pub async fn send_json(request: RequestBuilder, url: &str) -> Result<Value, ProviderError> {
    let response = request.send().await.map_err(|e| transport_error(e, url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = match error_detail(&body) {
            Some(detail) => format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate(&detail, ERROR_BODY_LIMIT)
            ),
            None => format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("error")
            ),
        };
        log::debug!("{url} answered {message}");
        return Err(ProviderError::Server {
            status: Some(status.as_u16()),
            message,
        });
    }

    let body = response.text().await.map_err(|e| transport_error(e, url))?;
    serde_json::from_str(&body).map_err(|e| {
        ProviderError::InvalidResponse(format!(
            "response is not valid JSON ({e}): {}",
            truncate(&body, ERROR_BODY_LIMIT)
        ))
    })
}

/// Human-readable part of an error body.
///
/// JSON bodies are searched for `error.message` (OpenAI, Gemini, Claude),
/// followed by its `code`, `type` or `status` in parentheses, then `error`
/// (Ollama), `message` and `detail` (FastAPI).  Anything else is returned as
/// trimmed raw text.  `None` for an empty body.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return Some(body.to_string()),
    };

    let error = &json["error"];
    if let Some(message) = non_empty_str(&error["message"]) {
        // Classification matches on codes such as `insufficient_quota`.
        let code = non_empty_str(&error["code"])
            .or_else(|| non_empty_str(&error["type"]))
            .or_else(|| non_empty_str(&error["status"]));
        return Some(match code {
            Some(code) => format!("{message} ({code})"),
            None => message,
        });
    }

    let detail = non_empty_str(error)
        .or_else(|| non_empty_str(&json["message"]))
        .or_else(|| non_empty_str(&json["detail"]));
    Some(detail.unwrap_or_else(|| body.to_string()))
}

fn transport_error(e: reqwest::Error, url: &str) -> ProviderError {
    if e.is_timeout() {
        return ProviderError::Timeout;
    }
    // reqwest's message embeds the full URL, query string (API keys) included.
    let e = e.without_url();
    ProviderError::Network(format!(
        "Cannot reach {url} ({e}). Check: 1) the URL is correct, 2) the server is running, \
         3) CORS is enabled for this client, 4) no firewall or proxy is blocking the request"
    ))
}

/// Trimmed, non-empty string at `value`, if any.
pub fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Cut `text` to at most `limit` characters (not bytes).
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
