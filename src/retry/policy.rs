//! Bounded retry with linear backoff.
//!
//! Only [`is_transient`] failures are retried; everything else is returned
//! from the attempt that produced it.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::provider::ProviderError;

/// HTTP statuses that usually clear up on their own.
pub const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// `true` when the failure is worth another attempt.
///
/// Structured statuses decide when present; a status-less provider message
/// is retried only if it reads like rate limiting.
pub fn is_transient(error: &ProviderError) -> bool {
    match error {
        ProviderError::Server {
            status: Some(code), ..
        } => TRANSIENT_STATUSES.contains(code),
        ProviderError::Server {
            status: None,
            message,
        } => {
            let lower = message.to_lowercase();
            lower.contains("rate_limit") || lower.contains("rate limit")
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            max_retries: cfg.max_retries,
            base_delay: Duration::from_millis(cfg.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Sleep before the attempt following failed attempt `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt + 1)
    }

    /// Run `operation` until it succeeds, fails permanently, or the retry
    /// budget is spent.  Returns the last error in the latter two cases.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "Attempt {}/{} failed ({e}); retrying in {delay:?}",
                        attempt + 1,
                        self.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn server(status: u16) -> ProviderError {
        ProviderError::Server {
            status: Some(status),
            message: format!("HTTP {status}"),
        }
    }

    fn instant(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    #[test]
    fn transient_statuses() {
        for code in [429, 500, 502, 503, 504] {
            assert!(is_transient(&server(code)), "{code}");
        }
        for code in [400, 401, 403, 404, 408, 501] {
            assert!(!is_transient(&server(code)), "{code}");
        }
    }

    #[test]
    fn status_less_rate_limit_message_is_transient() {
        let err = ProviderError::Server {
            status: None,
            message: "Rate limit reached for requests".into(),
        };
        assert!(is_transient(&err));

        let err = ProviderError::Server {
            status: None,
            message: "content_filter".into(),
        };
        assert!(!is_transient(&err));
    }

    #[test]
    fn non_server_errors_are_final() {
        assert!(!is_transient(&ProviderError::Timeout));
        assert!(!is_transient(&ProviderError::Network("refused".into())));
        assert!(!is_transient(&ProviderError::MissingCredential("key".into())));
    }

    #[test]
    fn delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn retries_transient_failures_until_success() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = instant(2)
            .run(move || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 | 1 => Err(server(429)),
                    _ => Ok("done"),
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_budget_with_last_error() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = instant(2)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(server(503))
            })
            .await;

        assert_eq!(result, Err(server(503)));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = instant(2)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(server(401))
            })
            .await;

        assert_eq!(result, Err(server(401)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn waits_between_attempts() {
        let start = std::time::Instant::now();
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
        };
        let _: Result<(), _> = policy.run(|| async { Err(server(500)) }).await;

        // 100 ms after the first failure, 200 ms after the second.
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
