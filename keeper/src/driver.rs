use std::collections::HashMap;

use anchor_lang::prelude::Pubkey;
use log::{debug, info, warn};
use raffle::state::RaffleStatus;
use tokio::sync::Mutex;

use crate::chain::{RaffleChain, RaffleEntry, RandomnessOracle};
use crate::config::KeeperConfig;
use crate::error::{KeeperError, OracleError};
use crate::notify::{DrawResult, RefundResult};
use crate::retry::with_retry;

/// Drives a single raffle through commit, reveal and settlement.
pub struct Driver<'a, C, O> {
    pub chain: &'a C,
    pub oracle: &'a O,
    pub config: &'a KeeperConfig,
    /// Per raffle, the bound randomness request that failed to reveal as too old.
    pub stale: &'a Mutex<HashMap<Pubkey, Pubkey>>,
}

impl<C: RaffleChain, O: RandomnessOracle> Driver<'_, C, O> {
    pub async fn draw(&self, entry: &RaffleEntry) -> Result<DrawResult, KeeperError> {
        let address = entry.address;
        let policy = &self.config.retry;

        let in_flight = {
            let stale = self.stale.lock().await;
            entry
                .account
                .randomness_account
                .filter(|randomness| stale.get(&address) != Some(randomness))
        };

        let randomness = match in_flight {
            Some(randomness) => {
                info!("raffle {address}: resuming at reveal with {randomness}");
                randomness
            }
            None => {
                let randomness =
                    with_retry(policy, "create randomness", || self.oracle.create_request())
                        .await?;
                let receipt =
                    with_retry(policy, "commit", || self.chain.commit_draw(entry, &randomness))
                        .await?;
                info!(
                    "raffle {address}: committed {randomness} at slot {} ({})",
                    receipt.slot, receipt.signature
                );
                self.stale.lock().await.remove(&address);
                self.wait_for_slot_after(receipt.slot).await?;
                randomness
            }
        };

        let signature = match with_retry(policy, "reveal and draw", || {
            self.chain.reveal_and_draw(entry, &randomness)
        })
        .await
        {
            Ok(signature) => signature,
            Err(error) => {
                if error.is_stale_randomness() {
                    warn!("raffle {address}: randomness {randomness} is stale, recommitting next tick");
                    self.stale.lock().await.insert(address, randomness);
                }
                return Err(error);
            }
        };

        let settled = with_retry(policy, "fetch raffle", || self.chain.raffle(&address)).await?;
        let winner = settled
            .winner
            .ok_or_else(|| KeeperError::Program(format!("raffle {address} has no winner after draw")))?;
        info!("raffle {address}: winner {winner} ({signature})");

        Ok(DrawResult {
            raffle: address,
            winner,
            signature,
        })
    }

    /// Pays buyer runs in batches until the refund cursor reaches the end.
    pub async fn refund(&self, entry: &RaffleEntry) -> Result<RefundResult, KeeperError> {
        let address = entry.address;
        let policy = &self.config.retry;
        let mut current = entry.clone();
        let mut signatures = Vec::new();
        let mut runs_refunded = 0;

        loop {
            let cursor = match current.account.status {
                RaffleStatus::Refunded => current.account.refund_cursor as usize,
                _ => 0,
            };
            let buyers: Vec<Pubkey> = current
                .account
                .participants
                .iter()
                .skip(cursor)
                .take(self.config.refund_batch)
                .map(|run| run.buyer)
                .collect();

            let signature = with_retry(policy, "refund", || {
                self.chain.refund_tickets(&current, &buyers)
            })
            .await?;
            debug!("raffle {address}: refunded {} runs ({signature})", buyers.len());
            signatures.push(signature);
            runs_refunded += buyers.len();

            current.account =
                with_retry(policy, "fetch raffle", || self.chain.raffle(&address)).await?;
            if current.account.status == RaffleStatus::Refunded
                && current.account.refunds_complete()
            {
                break;
            }
            if current.account.refund_cursor as usize <= cursor {
                return Err(KeeperError::Program(format!(
                    "raffle {address}: refund cursor stuck at {cursor}"
                )));
            }
        }

        info!("raffle {address}: refunds complete, {runs_refunded} runs");
        Ok(RefundResult {
            raffle: address,
            runs_refunded,
            signatures,
        })
    }

    /// Reveal needs the ledger to have moved past the commit slot.
    async fn wait_for_slot_after(&self, commit_slot: u64) -> Result<(), KeeperError> {
        for _ in 0..self.config.reveal_poll_limit {
            tokio::time::sleep(self.config.reveal_delay).await;
            let slot = with_retry(&self.config.retry, "slot", || self.chain.slot()).await?;
            if slot > commit_slot {
                return Ok(());
            }
            debug!("slot {slot} not past commit slot {commit_slot}");
        }
        Err(OracleError::NotYetSettled.into())
    }
}
