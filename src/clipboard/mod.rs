//! System clipboard as a text source and sink, backed by the `arboard` crate.
//!
//! Each call opens a short-lived [`arboard::Clipboard`] handle; the handle is
//! not `Send` on every platform.

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The OS clipboard could not be opened.
    #[error("cannot access clipboard: {0}")]
    Access(String),

    #[error("cannot write clipboard: {0}")]
    Set(String),
}

/// Current clipboard text, or `None` when it is empty, blank or non-text.
pub fn read_text() -> Result<Option<String>, ClipboardError> {
    let mut clipboard = open()?;
    // `get_text` errors on empty / non-text content.
    Ok(clipboard.get_text().ok().filter(|t| !t.trim().is_empty()))
}

/// Replace the clipboard contents with `text`.
pub fn write_text(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = open()?;
    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::Set(e.to_string()))
}

fn open() -> Result<Clipboard, ClipboardError> {
    Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))
}
