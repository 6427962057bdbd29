//! Seams to the ledger and the randomness oracle. Backends translate
//! transport failures with [`KeeperError::from_rpc_message`].

use std::sync::Arc;

use anchor_lang::prelude::Pubkey;
use raffle::state::RaffleAccount;

use crate::error::KeeperError;

/// A raffle account together with its address.
#[derive(Debug, Clone)]
pub struct RaffleEntry {
    pub address: Pubkey,
    pub account: RaffleAccount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub signature: String,
    /// Slot the commit landed in. Reveal must wait until the ledger is past it.
    pub slot: u64,
}

#[allow(async_fn_in_trait)]
pub trait RaffleChain {
    async fn raffles(&self) -> Result<Vec<RaffleEntry>, KeeperError>;

    async fn raffle(&self, address: &Pubkey) -> Result<RaffleAccount, KeeperError>;

    async fn unix_timestamp(&self) -> Result<i64, KeeperError>;

    async fn slot(&self) -> Result<u64, KeeperError>;

    /// Oracle commit and `request_draw` in one transaction.
    async fn commit_draw(
        &self,
        raffle: &RaffleEntry,
        randomness: &Pubkey,
    ) -> Result<CommitReceipt, KeeperError>;

    /// Oracle reveal and `draw_winner` in one transaction. Returns the signature.
    async fn reveal_and_draw(
        &self,
        raffle: &RaffleEntry,
        randomness: &Pubkey,
    ) -> Result<String, KeeperError>;

    /// `refund_tickets` paying the token accounts of `buyers`, in run order
    /// from the raffle's refund cursor.
    async fn refund_tickets(
        &self,
        raffle: &RaffleEntry,
        buyers: &[Pubkey],
    ) -> Result<String, KeeperError>;
}

#[allow(async_fn_in_trait)]
pub trait RandomnessOracle {
    /// Creates a fresh randomness request on the configured queue.
    async fn create_request(&self) -> Result<Pubkey, KeeperError>;
}

impl<T: RaffleChain> RaffleChain for Arc<T> {
    async fn raffles(&self) -> Result<Vec<RaffleEntry>, KeeperError> {
        (**self).raffles().await
    }

    async fn raffle(&self, address: &Pubkey) -> Result<RaffleAccount, KeeperError> {
        (**self).raffle(address).await
    }

    async fn unix_timestamp(&self) -> Result<i64, KeeperError> {
        (**self).unix_timestamp().await
    }

    async fn slot(&self) -> Result<u64, KeeperError> {
        (**self).slot().await
    }

    async fn commit_draw(
        &self,
        raffle: &RaffleEntry,
        randomness: &Pubkey,
    ) -> Result<CommitReceipt, KeeperError> {
        (**self).commit_draw(raffle, randomness).await
    }

    async fn reveal_and_draw(
        &self,
        raffle: &RaffleEntry,
        randomness: &Pubkey,
    ) -> Result<String, KeeperError> {
        (**self).reveal_and_draw(raffle, randomness).await
    }

    async fn refund_tickets(
        &self,
        raffle: &RaffleEntry,
        buyers: &[Pubkey],
    ) -> Result<String, KeeperError> {
        (**self).refund_tickets(raffle, buyers).await
    }
}

impl<T: RandomnessOracle> RandomnessOracle for Arc<T> {
    async fn create_request(&self) -> Result<Pubkey, KeeperError> {
        (**self).create_request().await
    }
}
