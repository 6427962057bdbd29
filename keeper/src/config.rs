use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::KeeperError;
use crate::retry::RetryPolicy;

/// Scheduling and retry settings. Connection details belong to the
/// [`RaffleChain`](crate::RaffleChain) and [`RandomnessOracle`](crate::RandomnessOracle)
/// implementations handed to the keeper.
#[derive(Debug, Clone, PartialEq)]
pub struct KeeperConfig {
    pub scan_interval: Duration,
    pub retry: RetryPolicy,
    pub inter_raffle_delay: Duration,
    /// Wait between polls for the ledger to move past the commit slot.
    pub reveal_delay: Duration,
    pub reveal_poll_limit: u32,
    /// Buyer runs refunded per transaction.
    pub refund_batch: usize,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            inter_raffle_delay: Duration::from_millis(1000),
            reveal_delay: Duration::from_millis(2000),
            reveal_poll_limit: 10,
            refund_batch: 8,
        }
    }
}

impl KeeperConfig {
    pub fn from_env() -> Result<Self, KeeperError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `KEEPER_*` keys, falling back to defaults for
    /// missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, KeeperError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            scan_interval: parse(&lookup, "KEEPER_SCAN_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.scan_interval),
            retry: RetryPolicy {
                max_attempts: parse(&lookup, "KEEPER_RETRY_MAX_ATTEMPTS")?
                    .unwrap_or(defaults.retry.max_attempts),
                base_delay: parse(&lookup, "KEEPER_RETRY_BASE_DELAY_MS")?
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.retry.base_delay),
                backoff: parse(&lookup, "KEEPER_RETRY_BACKOFF")?.unwrap_or(defaults.retry.backoff),
                jitter: parse(&lookup, "KEEPER_RETRY_JITTER")?.unwrap_or(defaults.retry.jitter),
            },
            inter_raffle_delay: parse(&lookup, "KEEPER_INTER_RAFFLE_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.inter_raffle_delay),
            reveal_delay: parse(&lookup, "KEEPER_REVEAL_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.reveal_delay),
            reveal_poll_limit: parse(&lookup, "KEEPER_REVEAL_POLL_LIMIT")?
                .unwrap_or(defaults.reveal_poll_limit),
            refund_batch: parse(&lookup, "KEEPER_REFUND_BATCH")?.unwrap_or(defaults.refund_batch),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), KeeperError> {
        if self.scan_interval.is_zero() {
            return Err(KeeperError::Config("scan interval must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(KeeperError::Config("retry attempts must be at least 1".into()));
        }
        if !self.retry.backoff.is_finite() || self.retry.backoff < 1.0 {
            return Err(KeeperError::Config("retry backoff must be >= 1.0".into()));
        }
        if !(0.0..1.0).contains(&self.retry.jitter) {
            return Err(KeeperError::Config("retry jitter must be in [0, 1)".into()));
        }
        if self.reveal_poll_limit == 0 {
            return Err(KeeperError::Config("reveal poll limit must be at least 1".into()));
        }
        if self.refund_batch == 0 {
            return Err(KeeperError::Config("refund batch must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, KeeperError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| KeeperError::Config(format!("{key}={raw}: {e}")))
        })
        .transpose()
}
