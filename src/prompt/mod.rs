//! Correction prompt construction.
//!
//! * [`build`]: `(text, PromptOptions) -> Prompt`, pure.
//! * [`Tone`]: preserve / professional / casual.
//! * [`DictionaryEntry`]: custom dictionary rules appended to every prompt.
//!
//! ```rust
//! use typemagic::prompt::{build, PromptOptions, Tone};
//!
//! let options = PromptOptions { tone: Tone::Casual, ..PromptOptions::default() };
//! let prompt = build("i has a question", &options);
//! assert_eq!(prompt.user, "i has a question");
//! ```

pub mod builder;
pub mod dictionary;
pub mod templates;

pub use builder::{build, Prompt, PromptOptions, Tone};
pub use dictionary::{DictionaryAction, DictionaryEntry, DictionaryError};
