use raffle::state::{RaffleAccount, RaffleStatus};

use crate::chain::RaffleEntry;

#[derive(Debug, Clone)]
pub enum WorkItem {
    Draw(RaffleEntry),
    Refund(RaffleEntry),
}

impl WorkItem {
    pub fn entry(&self) -> &RaffleEntry {
        match self {
            WorkItem::Draw(entry) | WorkItem::Refund(entry) => entry,
        }
    }
}

pub fn is_drawable(account: &RaffleAccount, now: i64) -> bool {
    account.status == RaffleStatus::Active
        && !account.claimed
        && !account.participants.is_empty()
        && now > account.deadline
        && account.total_entries >= account.min_tickets as u64
}

/// Past the deadline short of `min_tickets`, or a refund that has not paid
/// every run yet.
pub fn needs_refund(account: &RaffleAccount, now: i64) -> bool {
    match account.status {
        RaffleStatus::Active => {
            now > account.deadline && account.total_entries < account.min_tickets as u64
        }
        RaffleStatus::Refunded => !account.refunds_complete(),
        _ => false,
    }
}

/// Work for one tick, oldest deadline first.
pub fn scan(raffles: Vec<RaffleEntry>, now: i64) -> Vec<WorkItem> {
    let mut work: Vec<WorkItem> = raffles
        .into_iter()
        .filter_map(|entry| {
            if is_drawable(&entry.account, now) {
                Some(WorkItem::Draw(entry))
            } else if needs_refund(&entry.account, now) {
                Some(WorkItem::Refund(entry))
            } else {
                None
            }
        })
        .collect();
    work.sort_by_key(|item| item.entry().account.deadline);
    work
}
