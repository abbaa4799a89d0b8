//! Correction orchestration.
//!
//! ```rust,no_run
//! use typemagic::config::{AppConfig, Secrets};
//! use typemagic::engine::{CorrectionEngine, CorrectionRequest, CorrectionSource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let secrets = Secrets::load()?;
//!     let engine = CorrectionEngine::from_config(&config);
//!
//!     match engine
//!         .correct("i has a question", &CorrectionRequest::default(),
//!                  CorrectionSource::ManualEntry, &config, &secrets)
//!         .await
//!     {
//!         Ok(result) => println!("{}", result.corrected_text),
//!         Err(e) => eprintln!("{e}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod corrector;
pub mod types;

pub use corrector::CorrectionEngine;
pub use types::{CorrectionError, CorrectionRequest, CorrectionResult, CorrectionSource};
