//! Retry with exponential backoff and jitter.

use std::future::Future;
use std::time::Duration;

use crate::constants::MAX_READ_ATTEMPTS;
use crate::error::{SheetCalError, SheetCalResult};

/// How many times to try an operation and how long to wait in between.
///
/// The wait before retry `n` (1-based) is `base * 2^n` plus a uniform
/// random jitter in `[0, jitter)`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base: Duration,
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_READ_ATTEMPTS,
            base: Duration::from_secs(1),
            jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base.saturating_mul(2u32.saturating_pow(attempt));
        let jitter = self.jitter.mul_f64(rand::random::<f64>());
        exp + jitter
    }

    /// Run `op` until it succeeds or `max_attempts` tries have failed.
    ///
    /// Every failure is logged with `what` and the error. The last error is
    /// returned as `ExhaustedRetries`.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> SheetCalResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SheetCalResult<T>>,
    {
        let mut attempt = 0;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    log::warn!("Error reading {what}, attempt {attempt}: {e}");

                    if attempt >= self.max_attempts {
                        return Err(SheetCalError::ExhaustedRetries {
                            range: what.to_string(),
                            attempts: attempt,
                            message: e.to_string(),
                        });
                    }

                    tokio::time::sleep(self.backoff(attempt)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn flaky(failures: u32, calls: &AtomicU32) -> SheetCalResult<&'static str> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < failures {
            Err(SheetCalError::Read {
                range: "Sheet1!B2:B1000".to_string(),
                message: "Service unavailable".to_string(),
            })
        } else {
            Ok("values")
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(5);

        let result = policy
            .run("Sheet1!B2:B1000", || async { flaky(3, &calls) })
            .await
            .unwrap();

        assert_eq!(result, "values");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::immediate(5);

        let err = policy
            .run("Sheet1!B2:B1000", || async { flaky(u32::MAX, &calls) })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        match err {
            SheetCalError::ExhaustedRetries { attempts, range, .. } => {
                assert_eq!(attempts, 5);
                assert_eq!(range, "Sheet1!B2:B1000");
            }
            other => panic!("Expected ExhaustedRetries, got {:?}", other),
        }
    }

    #[test]
    fn test_backoff_grows_exponentially_within_jitter() {
        let policy = RetryPolicy::default();

        for attempt in 1..5 {
            let wait = policy.backoff(attempt);
            let floor = Duration::from_secs(2u64.pow(attempt));
            assert!(wait >= floor);
            assert!(wait < floor + Duration::from_secs(1));
        }
    }
}
