use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;

use crate::error::KeeperError;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: f64,
    /// Fraction of the delay randomly added or removed, in `[0, 1)`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(800),
            backoff: 1.5,
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Wait before retrying after failed attempt number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        self.base_delay.mul_f64(self.backoff.powi(exponent))
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter <= 0.0 {
            return delay;
        }
        let factor = rand::thread_rng().gen_range(1.0 - self.jitter..=1.0 + self.jitter);
        delay.mul_f64(factor)
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or the
/// policy's attempts are used up.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, KeeperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, KeeperError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_retryable() => {
                debug!("{label}: not retryable: {error}");
                return Err(error);
            }
            Err(error) if attempt >= max_attempts => {
                return Err(KeeperError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }
            Err(error) => {
                let wait = policy.jittered(policy.backoff_delay(attempt));
                warn!("{label}: attempt {attempt}/{max_attempts} failed ({error}), retrying in {wait:?}");
                tokio::time::sleep(wait).await;
            }
        }
    }
}
