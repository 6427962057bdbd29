/// Seed of the singleton counter PDA that hands out raffle ids.
pub const COUNTER_SEED: &[u8] = b"global-counter";

/// Seed prefix of every raffle record PDA: `[RAFFLE_SEED, seller, id_le]`.
pub const RAFFLE_SEED: &[u8] = b"raffle";

/// Seed prefix of every escrow token account PDA: `[ESCROW_SEED, seller, id_le]`.
pub const ESCROW_SEED: &[u8] = b"escrow_payment";

pub const MAX_ITEM_NAME_LEN: usize = 32;
pub const MAX_ITEM_DESCRIPTION_LEN: usize = 64;
pub const MAX_ITEM_IMAGE_URI_LEN: usize = 64;
pub const MAX_TRACKING_INFO_LEN: usize = 64;

/// Number of `(buyer, count)` runs a raffle record can hold.
pub const MAX_TICKET_RUNS: usize = 64;

/// How long a winner may dispute a shipment, counted from `shipped_at`.
pub const DISPUTE_WINDOW_SECONDS: i64 = 30 * 24 * 60 * 60;

/// A commit must use a request seeded on the slot right before the commit slot.
pub const COMMIT_SEED_SLOT_OFFSET: u64 = 1;
