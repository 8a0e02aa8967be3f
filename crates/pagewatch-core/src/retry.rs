//! Bounded retry for fallible async operations
//!
//! The content fetcher retries a connection reset exactly once, immediately.
//! [`RetryPolicy`] states that as data (attempt budget plus a predicate on the
//! error) so the loop itself stays a plain `Result`-returning function.

use std::future::Future;

use crate::errors::{ExError, WatchError};

/// How many times to try, and which errors justify another attempt
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    should_retry: fn(&WatchError) -> bool,
}

impl RetryPolicy {
    /// Two attempts in total, retrying only transient errors
    pub fn single_retry_on_transient() -> Self {
        Self {
            max_attempts: 2,
            should_retry: WatchError::is_transient,
        }
    }

    /// One attempt, no retry
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            should_retry: WatchError::is_transient,
        }
    }

    /// Override the attempt budget; values below 1 are treated as 1
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    /// Override the retry predicate
    #[must_use]
    pub fn with_predicate(mut self, should_retry: fn(&WatchError) -> bool) -> Self {
        self.should_retry = should_retry;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether attempt number `attempt` (1-based) that failed with `err` may be followed by another
    pub fn allows_retry(&self, attempt: u32, err: &WatchError) -> bool {
        attempt < self.max_attempts && (self.should_retry)(err)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_retry_on_transient()
    }
}

/// Run `op` until it succeeds or the policy refuses another attempt
///
/// `op` receives the 1-based attempt number. There is no delay between
/// attempts. Each failure is logged with the attempt it happened on; the last
/// error is returned unchanged.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn retry_async<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, WatchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, WatchError>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if policy.allows_retry(attempt, &err) => {
                let ex_err = ExError::from(err).with_attempt(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts(),
                    err_code = ex_err.code(),
                    error = %ex_err,
                    "retrying after transient failure"
                );
                attempt += 1;
            }
            Err(err) => {
                if attempt > 1 {
                    let ex_err = ExError::from(err.clone()).with_attempt(attempt);
                    tracing::warn!(
                        attempt,
                        err_code = ex_err.code(),
                        error = %ex_err,
                        "giving up after final attempt"
                    );
                }
                return Err(err);
            }
        }
    }
}
