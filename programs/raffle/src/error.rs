use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    // validation
    #[msg("Selling price and ticket price must be greater than zero")]
    InvalidPrice,
    #[msg("Ticket counts must satisfy max_tickets >= min_tickets >= 1")]
    InvalidTicketCount,
    #[msg("Deadline must be in the future")]
    InvalidDeadline,
    #[msg("Item name can only be a maximum of 32 chars")]
    NameTooLong,
    #[msg("Item description can only be a maximum of 64 chars")]
    DescriptionTooLong,
    #[msg("Item image uri can only be a maximum of 64 chars")]
    ImageUriTooLong,
    #[msg("Tracking info can only be a maximum of 64 chars")]
    TrackingInfoTooLong,
    #[msg("Token account does not use the raffle payment mint")]
    InvalidPaymentMint,

    // state guards
    #[msg("Counter already initialized")]
    AlreadyInitialized,
    #[msg("Raffle not active")]
    RaffleNotActive,
    #[msg("Deadline passed")]
    DeadlinePassed,
    #[msg("Invalid status")]
    InvalidStatus,
    #[msg("Already claimed")]
    AlreadyClaimed,
    #[msg("Cannot draw yet")]
    CannotDrawYet,
    #[msg("Entries full! You missed the opportunity!")]
    EntriesFull,
    #[msg("Participants full!")]
    RaffleFull,
    #[msg("Min tickets not reached")]
    MinTicketsNotReached,
    #[msg("Min tickets reached")]
    MinTicketsReached,
    #[msg("No participants")]
    NoParticipants,
    #[msg("Raffle already has entries")]
    RaffleHasEntries,
    #[msg("Refund account does not belong to the next participant")]
    RefundAccountMismatch,
    #[msg("Invalid delivery status for this action")]
    InvalidDeliveryStatus,
    #[msg("Dispute window closed")]
    DisputeWindowClosed,

    // arithmetic
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Arithmetic underflow")]
    Underflow,

    // authorization
    #[msg("Unauthorized request!")]
    Unauthorized,
    #[msg("Not winner")]
    NotWinner,
    #[msg("Not seller")]
    NotSeller,

    // randomness
    #[msg("Invalid randomness account data!")]
    InvalidRandomnessAccount,
    #[msg("Random data too old!")]
    RandomnessTooOld,
    #[msg("Randomness already revealed!")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness not resolved!")]
    RandomnessNotResolved,
}
