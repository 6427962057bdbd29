use anchor_lang::prelude::*;

#[event]
#[derive(Debug)]
pub struct RaffleCreated {
    pub raffle: Pubkey,
    pub seller: Pubkey,
    pub ticket_price: u64,
    pub deadline: i64,
}

#[event]
pub struct TicketsBought {
    pub buyer: Pubkey,
    pub raffle: Pubkey,
    pub num_tickets: u32,
    pub total_entries: u64,
}

#[event]
pub struct DrawRequested {
    pub raffle: Pubkey,
    pub randomness: Pubkey,
}

#[event]
#[derive(Debug)]
pub struct WinnerDrawn {
    pub raffle: Pubkey,
    pub winner: Pubkey,
    pub winner_index: u64,
    pub payout: u64,
}

#[event]
pub struct RaffleRefunded {
    pub raffle: Pubkey,
    pub total_entries: u64,
    pub min_tickets: u32,
}

#[event]
pub struct TicketsRefunded {
    pub raffle: Pubkey,
    pub buyer: Pubkey,
    pub amount: u64,
}

#[event]
pub struct RaffleCancelled {
    pub raffle: Pubkey,
    pub seller: Pubkey,
}

#[event]
#[derive(Debug)]
pub struct ProductShipped {
    pub raffle: Pubkey,
    pub winner: Pubkey,
    pub shipped_at: i64,
}

#[event]
#[derive(Debug)]
pub struct ProductDelivered {
    pub raffle: Pubkey,
    pub winner: Pubkey,
    pub delivered_at: i64,
}

#[event]
pub struct DisputeOpened {
    pub raffle: Pubkey,
    pub winner: Pubkey,
    pub opened_at: i64,
}

#[event]
pub struct DisputeResolved {
    pub raffle: Pubkey,
    pub resolved_by: Pubkey,
}
