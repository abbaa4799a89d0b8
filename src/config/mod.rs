//! Configuration module for TypeMagic.
//!
//! Provides `AppConfig` (provider, correction and retry settings), `Secrets`
//! (API keys, stored separately), `AppPaths` for the platform config
//! directory, and TOML persistence for both files.

pub mod paths;
pub mod secrets;
pub mod settings;

pub use paths::AppPaths;
pub use secrets::Secrets;
pub use settings::{AppConfig, CorrectionConfig, ProviderSettings, RetryConfig};
