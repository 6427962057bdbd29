//! Off-chain keeper for the raffle program. Each tick it scans every raffle,
//! draws the ones past their deadline with enough entries and refunds the
//! ones without.

pub mod chain;
pub mod config;
pub mod driver;
pub mod error;
pub mod keeper;
pub mod notify;
pub mod retry;
pub mod scan;

pub use chain::{CommitReceipt, RaffleChain, RaffleEntry, RandomnessOracle};
pub use config::KeeperConfig;
pub use error::{KeeperError, OracleError, TransientKind};
pub use keeper::Keeper;
pub use notify::{BroadcastNotifier, DrawResult, LogNotifier, Notifier, RefundResult, TickReport};
pub use retry::{with_retry, RetryPolicy};
