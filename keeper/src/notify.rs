use anchor_lang::prelude::Pubkey;
use log::{debug, error, info};
use tokio::sync::broadcast;

use crate::error::KeeperError;

/// A raffle settled during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawResult {
    pub raffle: Pubkey,
    pub winner: Pubkey,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundResult {
    pub raffle: Pubkey,
    pub runs_refunded: usize,
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedRaffle {
    pub raffle: Pubkey,
    pub error: KeeperError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub drawn: Vec<DrawResult>,
    pub refunded: Vec<RefundResult>,
    pub failed: Vec<FailedRaffle>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty() && self.refunded.is_empty() && self.failed.is_empty()
    }
}

pub trait Notifier {
    fn publish(&self, report: &TickReport);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish(&self, report: &TickReport) {
        for draw in &report.drawn {
            info!(
                "raffle {} won by {} ({})",
                draw.raffle, draw.winner, draw.signature
            );
        }
        for refund in &report.refunded {
            info!(
                "raffle {} refunded {} runs in {} transactions",
                refund.raffle,
                refund.runs_refunded,
                refund.signatures.len()
            );
        }
        for failed in &report.failed {
            error!("raffle {} deferred: {}", failed.raffle, failed.error);
        }
    }
}

/// Pushes every draw result to subscribers.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<DrawResult>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<DrawResult>) {
        let (sender, receiver) = broadcast::channel(capacity);
        (Self { sender }, receiver)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DrawResult> {
        self.sender.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, report: &TickReport) {
        for draw in &report.drawn {
            if self.sender.send(draw.clone()).is_err() {
                debug!("no subscribers for raffle {}", draw.raffle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_delivers_draws() {
        let (notifier, mut receiver) = BroadcastNotifier::new(4);
        let draw = DrawResult {
            raffle: Pubkey::new_unique(),
            winner: Pubkey::new_unique(),
            signature: "sig".to_string(),
        };
        notifier.publish(&TickReport {
            drawn: vec![draw.clone()],
            ..TickReport::default()
        });
        assert_eq!(receiver.try_recv().unwrap(), draw);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let (notifier, receiver) = BroadcastNotifier::new(4);
        drop(receiver);
        notifier.publish(&TickReport {
            drawn: vec![DrawResult {
                raffle: Pubkey::new_unique(),
                winner: Pubkey::new_unique(),
                signature: "sig".to_string(),
            }],
            ..TickReport::default()
        });
    }
}
