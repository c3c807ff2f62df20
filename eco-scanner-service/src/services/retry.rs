//! Retry wrapper for rate-limited model calls.
//!
//! Only [`ProviderError::RateLimited`] is retried. The wait before retry `n`
//! is `n * base_delay` (3s, 6s, ... by default). Every other error, and a
//! rate-limit error on the last attempt, is returned to the caller as is.

use crate::services::providers::ProviderError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total number of calls, including the first one.
    pub max_attempts: u32,
    /// Delay unit for linear backoff.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(3000),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the attempt following `attempt` (1-based).
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Run `f` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    f: F,
) -> Result<T, ProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    for attempt in 1..=policy.max_attempts {
        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        operation = operation_name,
                        attempt, "Model call succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) if err.is_rate_limited() && attempt < policy.max_attempts => {
                let delay = policy.backoff_duration(attempt);
                info!(
                    operation = operation_name,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited. Retrying in {}s",
                    delay.as_secs_f64()
                );
                sleep(delay).await;
            }
            Err(err) => {
                warn!(
                    operation = operation_name,
                    attempt,
                    error = %err,
                    "Model call failed"
                );
                return Err(err);
            }
        }
    }

    Err(ProviderError::MaxRetriesExceeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn rate_limited() -> ProviderError {
        ProviderError::RateLimited("Resource has been exhausted".to_string())
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_duration(1), Duration::from_secs(3));
        assert_eq!(policy.backoff_duration(2), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_linear_backoff() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result = with_retry(&RetryPolicy::default(), "test", || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(rate_limited())
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(9000), "waited {:?}", waited);
        assert!(waited < Duration::from_millis(9100), "waited {:?}", waited);
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_propagate_immediately() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = Instant::now();

        let result: Result<(), _> = with_retry(&RetryPolicy::default(), "test", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::ApiError("Gemini API error 500: boom".to_string()))
        })
        .await;

        assert!(matches!(result, Err(ProviderError::ApiError(ref m)) if m.contains("boom")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_rate_limit_returns_the_rate_limit_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let result: Result<(), _> = with_retry(&RetryPolicy::default(), "test", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(rate_limited())
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("429"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_hits_the_fallback() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..Default::default()
        };
        let result: Result<(), _> = with_retry(&policy, "test", || async { Ok(()) }).await;
        assert!(matches!(result, Err(ProviderError::MaxRetriesExceeded)));
    }
}
