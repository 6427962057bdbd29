use std::collections::{HashMap, HashSet};

use anchor_lang::prelude::Pubkey;
use log::{error, info};
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;

use crate::chain::{RaffleChain, RandomnessOracle};
use crate::config::KeeperConfig;
use crate::driver::Driver;
use crate::error::KeeperError;
use crate::notify::{FailedRaffle, Notifier, TickReport};
use crate::retry::with_retry;
use crate::scan::{scan, WorkItem};

pub struct Keeper<C, O, N> {
    config: KeeperConfig,
    chain: C,
    oracle: O,
    notifier: N,
    stale: Mutex<HashMap<Pubkey, Pubkey>>,
}

impl<C, O, N> Keeper<C, O, N>
where
    C: RaffleChain,
    O: RandomnessOracle,
    N: Notifier,
{
    pub fn new(config: KeeperConfig, chain: C, oracle: O, notifier: N) -> Self {
        Self {
            config,
            chain,
            oracle,
            notifier,
            stale: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    /// One scan: draws every eligible raffle and refunds every undersubscribed
    /// one. A failing raffle is recorded and skipped.
    pub async fn tick(&self) -> Result<TickReport, KeeperError> {
        let policy = &self.config.retry;
        let now = with_retry(policy, "clock", || self.chain.unix_timestamp()).await?;
        let raffles = with_retry(policy, "scan", || self.chain.raffles()).await?;
        let total = raffles.len();
        let work = scan(raffles, now);
        info!("scanned {total} raffles, {} need work", work.len());
        self.prune_stale(&work).await;

        let driver = Driver {
            chain: &self.chain,
            oracle: &self.oracle,
            config: &self.config,
            stale: &self.stale,
        };
        let mut report = TickReport::default();

        for (i, item) in work.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.inter_raffle_delay).await;
            }
            let address = item.entry().address;
            let outcome = match item {
                WorkItem::Draw(entry) => driver.draw(entry).await.map(|r| report.drawn.push(r)),
                WorkItem::Refund(entry) => {
                    driver.refund(entry).await.map(|r| report.refunded.push(r))
                }
            };
            if let Err(error) = outcome {
                error!("raffle {address}: {error}");
                report.failed.push(FailedRaffle {
                    raffle: address,
                    error,
                });
            }
        }

        info!(
            "tick done: {} drawn, {} refunded, {} failed",
            report.drawn.len(),
            report.refunded.len(),
            report.failed.len()
        );
        self.notifier.publish(&report);
        Ok(report)
    }

    /// Raffles with stale randomness still awaiting a fresh commit.
    pub async fn stale_raffles(&self) -> Vec<Pubkey> {
        self.stale.lock().await.keys().copied().collect()
    }

    /// Forgets stale requests of raffles that no longer need a draw.
    async fn prune_stale(&self, work: &[WorkItem]) {
        let drawable: HashSet<Pubkey> = work
            .iter()
            .filter_map(|item| match item {
                WorkItem::Draw(entry) => Some(entry.address),
                WorkItem::Refund(_) => None,
            })
            .collect();
        self.stale
            .lock()
            .await
            .retain(|raffle, _| drawable.contains(raffle));
    }

    /// Ticks every `scan_interval` until `shutdown` flips to `true` or its
    /// sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.config.scan_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("keeper started, scanning every {:?}", self.config.scan_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(error) = self.tick().await {
                        error!("scan failed: {error}");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("keeper stopped");
    }
}
