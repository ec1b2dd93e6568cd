use sentiview_core::{CoreError, ErrorExt, RetrySettings};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Backoff policy for idempotent backend reads.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            base_delay: Duration::from_millis(settings.base_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
            backoff_multiplier: 2.0,
            jitter_factor: settings.jitter_factor,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable
    /// error, or runs out of attempts.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!("{} succeeded after {} retries", operation_name, attempt);
                    }
                    return Ok(result);
                }
                Err(error) => {
                    attempt += 1;
                    if attempt >= self.max_attempts || !error.is_retryable() {
                        if attempt > 1 {
                            warn!("{} failed after {} attempts: {}", operation_name, attempt, error);
                        }
                        return Err(error);
                    }

                    let backoff = calculate_delay(attempt - 1, self);
                    let delay = error
                        .retry_after()
                        .map_or(backoff, |hint| hint.max(backoff))
                        .min(self.max_delay);
                    debug!(
                        "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                        attempt, self.max_attempts, operation_name, error, delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Exponential backoff with jitter, capped at `max_delay`.
pub fn calculate_delay(attempt: u32, policy: &RetryPolicy) -> Duration {
    let base_ms = policy.base_delay.as_millis() as f64;
    let max_ms = policy.max_delay.as_millis() as u64;

    let exponential_ms = (base_ms * policy.backoff_multiplier.powi(attempt as i32)) as u64;
    let exponential_ms = exponential_ms.min(max_ms);

    let jitter_range = (exponential_ms as f64 * policy.jitter_factor) as u64;
    let jitter = fastrand::u64(0..=jitter_range);

    Duration::from_millis((exponential_ms + jitter).min(max_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiview_core::ApiError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            backoff_multiplier: 2.0,
            jitter_factor: 0.0,
        };
        assert_eq!(calculate_delay(0, &policy), Duration::from_millis(100));
        assert_eq!(calculate_delay(1, &policy), Duration::from_millis(200));
        assert_eq!(calculate_delay(2, &policy), Duration::from_millis(400));
        assert_eq!(calculate_delay(3, &policy), Duration::from_millis(500));
    }

    #[test]
    fn test_jitter_stays_within_cap() {
        let policy = RetryPolicy {
            jitter_factor: 1.0,
            ..fast_policy(3)
        };
        for attempt in 0..6 {
            assert!(calculate_delay(attempt, &policy) <= policy.max_delay);
        }
    }

    #[test]
    fn test_default_policy_does_not_retry() {
        assert_eq!(RetryPolicy::default().max_attempts, 1);
        assert_eq!(RetryPolicy::no_retry().max_attempts, 1);
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = fast_policy(3)
            .execute("flaky", move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(CoreError::Api(ApiError::ServerError { status_code: 503 }))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), CoreError> = fast_policy(5)
            .execute("missing", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::Api(ApiError::NotFound {
                    endpoint: "groups".to_string(),
                }))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), CoreError> = fast_policy(2)
            .execute("down", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(CoreError::Api(ApiError::RequestTimeout))
            })
            .await;

        assert!(matches!(result, Err(CoreError::Api(ApiError::RequestTimeout))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
