//! TypeMagic: AI text correction core.
//!
//! Takes a piece of user text plus a correction request, builds a tone-aware
//! prompt, dispatches it to the configured provider (OpenAI, Gemini, Claude,
//! a self-hosted FastAPI-compatible server or a local Ollama server), retries
//! transient failures and returns either the corrected text or a classified,
//! user-facing error.
//!
//! ```text
//! text + CorrectionRequest + AppConfig/Secrets
//!        │
//!        ▼
//! prompt::build ──▶ ProviderRouter::adapter ──▶ RetryPolicy::run(TextProvider::complete)
//!                                                      │
//!                                   Ok(text) ◀─────────┴────▶ classify ──▶ CorrectionError
//! ```

pub mod clipboard;
pub mod config;
pub mod engine;
pub mod prompt;
pub mod provider;
pub mod retry;
pub mod stats;
