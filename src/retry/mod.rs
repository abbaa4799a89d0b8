//! Retry and error classification, kept as two separate units.
//!
//! * [`RetryPolicy`] decides whether to try again.
//! * [`classify`] decides what to tell the user once no retry is left.

pub mod classify;
pub mod policy;

pub use classify::{classify, Classification, ErrorKind};
pub use policy::{is_transient, RetryPolicy};
