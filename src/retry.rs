//! Bounded retry with exponential backoff for collaborator calls.
//!
//! The policy wraps the embedding, vector-store, and chat boundaries only;
//! chunking and batching stay pure and are never retried.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

/// Injectable retry policy: max attempts and a backoff schedule that
/// doubles per attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` of zero is treated as one attempt.
    pub fn new(max_attempts: usize, base_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_backoff,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Total attempts allowed per operation.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    pub async fn run<T, F, Fut>(&self, op_name: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    warn!(op = op_name, attempt, error = %e, "Operation failed, retrying");
                    tokio::time::sleep(self.backoff_for(attempt)).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("{op_name} failed after {attempt} attempt(s)"));
                }
            }
        }
    }

    fn backoff_for(&self, attempt: usize) -> Duration {
        let shift = (attempt - 1).min(16) as u32;
        self.base_backoff * (1u32 << shift)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let result: Result<u32> = policy
            .run("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(7) }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let result: Result<u32> = policy
            .run("op", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        anyhow::bail!("transient failure")
                    }
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stops_after_max_attempts() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let result: Result<u32> = policy
            .run("op", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { anyhow::bail!("always fails") }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(100));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
    }
}
