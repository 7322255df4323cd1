use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    pub attempts: usize,
    pub delay_secs: u64,
    pub timeout_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_secs: 2,
            timeout_secs: 60,
        }
    }
}

/// Fixed-delay retry with a bounded attempt budget. No exponential backoff:
/// the oracle transport is the only blocking operation in the run and a
/// flat delay keeps round timing predictable.
pub struct RetryPolicy {
    attempts: usize,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: usize, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Retry a fallible future up to the attempt budget, sleeping the fixed
    /// delay after each failure. Returns the last error once the budget is
    /// exhausted.
    pub async fn run<F, Fut, T, E>(&self, operation_name: &str, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "Operation failed"
                    );
                    if attempt >= self.attempts {
                        return Err(e);
                    }
                    sleep(self.delay).await;
                }
            }
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.attempts, Duration::from_secs(config.delay_secs))
    }
}
