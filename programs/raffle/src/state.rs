use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::RaffleError;

/// Singleton record that hands out raffle ids and names the program authority.
#[account]
#[derive(Debug, InitSpace)]
pub struct Counter {
    /// Id given to the next raffle created. Post-incremented on every creation.
    pub next_id: u64,

    /// The party allowed to commit randomness, draw winners and resolve disputes.
    /// This is the keeper's signing key.
    pub authority: Pubkey,

    /// Set once by `initialize_counter`.
    pub is_initialized: bool,

    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,
}

impl Counter {
    pub fn address() -> (Pubkey, u8) {
        Pubkey::find_program_address(&[COUNTER_SEED], &crate::ID)
    }

    pub fn initialize(&mut self, authority: Pubkey, bump: u8) -> Result<()> {
        require!(!self.is_initialized, RaffleError::AlreadyInitialized);
        self.next_id = 0;
        self.authority = authority;
        self.is_initialized = true;
        self.bump = bump;
        Ok(())
    }

    /// Returns the id for the raffle being created and advances the counter.
    pub fn allocate(&mut self) -> Result<u64> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(RaffleError::Overflow)?;
        Ok(id)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub enum RaffleStatus {
    Active,
    Drawing,
    Completed,
    Cancelled,
    Refunded,
}

impl RaffleStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RaffleStatus::Completed | RaffleStatus::Cancelled | RaffleStatus::Refunded
        )
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub enum DeliveryStatus {
    /// Winner selected, awaiting shipment.
    Pending,
    Shipped,
    Delivered,
    Disputed,
    Resolved,
}

/// Consecutive tickets bought by one buyer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub struct TicketRun {
    pub buyer: Pubkey,
    pub count: u32,
}

/// Everything the seller supplies when opening a raffle.
#[derive(Clone, Debug)]
pub struct RaffleTerms {
    pub item_name: String,
    pub item_description: String,
    pub item_image_uri: String,
    pub selling_price: u64,
    pub ticket_price: u64,
    pub min_tickets: u32,
    pub max_tickets: u32,
    pub deadline: i64,
}

impl RaffleTerms {
    /// Rejects terms that could never produce a valid raffle.
    ///
    /// # Arguments
    /// * `now` - current UNIX timestamp; the deadline must be strictly after it
    pub fn validate(&self, now: i64) -> Result<()> {
        require!(self.selling_price > 0, RaffleError::InvalidPrice);
        require!(self.ticket_price > 0, RaffleError::InvalidPrice);
        require!(self.min_tickets > 0, RaffleError::InvalidTicketCount);
        require!(
            self.max_tickets >= self.min_tickets,
            RaffleError::InvalidTicketCount
        );
        require!(self.deadline > now, RaffleError::InvalidDeadline);
        require!(
            self.item_name.len() <= MAX_ITEM_NAME_LEN,
            RaffleError::NameTooLong
        );
        require!(
            self.item_description.len() <= MAX_ITEM_DESCRIPTION_LEN,
            RaffleError::DescriptionTooLong
        );
        require!(
            self.item_image_uri.len() <= MAX_ITEM_IMAGE_URI_LEN,
            RaffleError::ImageUriTooLong
        );

        // a sold-out raffle must still be representable
        self.ticket_price
            .checked_mul(self.max_tickets as u64)
            .ok_or(RaffleError::Overflow)?;

        Ok(())
    }
}

#[account]
#[derive(Debug, InitSpace)]
pub struct RaffleAccount {
    /// Sequential id allocated from the counter. Part of the PDA seeds.
    pub raffle_id: u64,

    /// The account that created the raffle and receives the proceeds.
    pub seller: Pubkey,

    /// The fungible token accepted for tickets.
    pub payment_mint: Pubkey,

    #[max_len(32)]
    pub item_name: String,

    #[max_len(64)]
    pub item_description: String,

    /// Content-addressed reference to the item image.
    #[max_len(64)]
    pub item_image_uri: String,

    /// Declared value of the item, in payment-mint base units (6 decimals).
    pub selling_price: u64,

    /// Price of a single ticket, in payment-mint base units.
    pub ticket_price: u64,

    /// Entries needed for a draw; below this the raffle is refunded.
    pub min_tickets: u32,

    /// Hard cap on entries.
    pub max_tickets: u32,

    /// UNIX timestamp after which no tickets are sold and drawing may start.
    pub deadline: i64,

    /// Ticket holders in purchase order, stored as `(buyer, count)` runs.
    /// Expanding the runs gives one entry per ticket.
    #[max_len(64)]
    pub participants: Vec<TicketRun>,

    /// Total amount paid into escrow for tickets.
    pub total_collected: u64,

    /// Total tickets sold. Always equals the sum of the run counts.
    pub total_entries: u64,

    /// `total_entries * 100 / max_tickets`, capped at 100.
    pub progress: u32,

    pub is_sold_out: bool,

    pub status: RaffleStatus,

    /// The oracle request committed for the draw, if any.
    pub randomness_account: Option<Pubkey>,

    pub winner: Option<Pubkey>,

    /// True once a winner has been drawn and the proceeds released.
    pub claimed: bool,

    pub delivery_status: DeliveryStatus,

    #[max_len(64)]
    pub tracking_info: Option<String>,

    pub shipped_at: Option<i64>,

    pub dispute_deadline: Option<i64>,

    /// Index of the next participant run to refund.
    pub refund_cursor: u32,

    pub bump: u8,

    pub escrow_bump: u8,
}

impl RaffleAccount {
    pub fn address(seller: &Pubkey, raffle_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[RAFFLE_SEED, seller.as_ref(), &raffle_id.to_le_bytes()],
            &crate::ID,
        )
    }

    pub fn escrow_address(seller: &Pubkey, raffle_id: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[ESCROW_SEED, seller.as_ref(), &raffle_id.to_le_bytes()],
            &crate::ID,
        )
    }

    pub fn open(
        raffle_id: u64,
        seller: Pubkey,
        payment_mint: Pubkey,
        terms: RaffleTerms,
        bump: u8,
        escrow_bump: u8,
    ) -> Self {
        Self {
            raffle_id,
            seller,
            payment_mint,
            item_name: terms.item_name,
            item_description: terms.item_description,
            item_image_uri: terms.item_image_uri,
            selling_price: terms.selling_price,
            ticket_price: terms.ticket_price,
            min_tickets: terms.min_tickets,
            max_tickets: terms.max_tickets,
            deadline: terms.deadline,
            participants: Vec::new(),
            total_collected: 0,
            total_entries: 0,
            progress: 0,
            is_sold_out: false,
            status: RaffleStatus::Active,
            randomness_account: None,
            winner: None,
            claimed: false,
            delivery_status: DeliveryStatus::Pending,
            tracking_info: None,
            shipped_at: None,
            dispute_deadline: None,
            refund_cursor: 0,
            bump,
            escrow_bump,
        }
    }

    pub fn calculate_progress(total_entries: u64, max_tickets: u32) -> Result<u32> {
        if max_tickets == 0 {
            return Ok(0);
        }
        let percentage = total_entries
            .checked_mul(100)
            .ok_or(RaffleError::Overflow)?
            / max_tickets as u64;
        Ok(percentage.min(100) as u32)
    }

    /// Ticket holder at `index` in purchase order, counting one entry per ticket.
    pub fn participant_at(&self, index: u64) -> Option<Pubkey> {
        let mut remaining = index;
        for run in &self.participants {
            let count = run.count as u64;
            if remaining < count {
                return Some(run.buyer);
            }
            remaining -= count;
        }
        None
    }

    pub fn tickets_of(&self, buyer: &Pubkey) -> u64 {
        self.participants
            .iter()
            .filter(|run| run.buyer == *buyer)
            .map(|run| run.count as u64)
            .sum()
    }

    /// Validates a purchase and books it. Returns the amount the buyer owes.
    /// Nothing is mutated when an error is returned.
    pub fn record_purchase(&mut self, buyer: Pubkey, num_tickets: u32, now: i64) -> Result<u64> {
        require!(
            self.status == RaffleStatus::Active,
            RaffleError::RaffleNotActive
        );
        require!(num_tickets > 0, RaffleError::InvalidTicketCount);
        require!(now <= self.deadline, RaffleError::DeadlinePassed);

        let total_entries = self
            .total_entries
            .checked_add(num_tickets as u64)
            .ok_or(RaffleError::Overflow)?;
        require!(
            total_entries <= self.max_tickets as u64,
            RaffleError::EntriesFull
        );

        let cost = (num_tickets as u64)
            .checked_mul(self.ticket_price)
            .ok_or(RaffleError::Overflow)?;
        let total_collected = self
            .total_collected
            .checked_add(cost)
            .ok_or(RaffleError::Overflow)?;
        let progress = Self::calculate_progress(total_entries, self.max_tickets)?;

        match self.participants.last_mut() {
            Some(run) if run.buyer == buyer => {
                run.count = run
                    .count
                    .checked_add(num_tickets)
                    .ok_or(RaffleError::Overflow)?;
            }
            _ => {
                require!(
                    self.participants.len() < MAX_TICKET_RUNS,
                    RaffleError::RaffleFull
                );
                self.participants.push(TicketRun {
                    buyer,
                    count: num_tickets,
                });
            }
        }

        self.total_entries = total_entries;
        self.total_collected = total_collected;
        self.progress = progress;
        self.is_sold_out = total_entries == self.max_tickets as u64;

        Ok(cost)
    }

    /// Guards shared by the commit and the reveal/draw steps.
    pub fn check_drawable(&self, now: i64) -> Result<()> {
        require!(
            self.status == RaffleStatus::Active,
            RaffleError::InvalidStatus
        );
        require!(!self.claimed, RaffleError::AlreadyClaimed);
        require!(now > self.deadline, RaffleError::CannotDrawYet);
        require!(
            self.total_entries >= self.min_tickets as u64,
            RaffleError::MinTicketsNotReached
        );
        require!(!self.participants.is_empty(), RaffleError::NoParticipants);
        Ok(())
    }

    /// Binds an oracle request to this raffle. The request must have been seeded
    /// on the slot right before `current_slot`, so its value is still unknown.
    /// A later commit replaces an earlier one that went stale.
    pub fn commit_randomness(
        &mut self,
        randomness: Pubkey,
        seed_slot: u64,
        current_slot: u64,
        now: i64,
    ) -> Result<()> {
        self.check_drawable(now)?;
        let previous_slot = current_slot
            .checked_sub(COMMIT_SEED_SLOT_OFFSET)
            .ok_or(RaffleError::Underflow)?;
        require!(
            seed_slot == previous_slot,
            RaffleError::RandomnessAlreadyRevealed
        );
        self.randomness_account = Some(randomness);
        Ok(())
    }

    pub fn winner_index(&self, value: &[u8; 32]) -> Result<u64> {
        require!(self.total_entries > 0, RaffleError::NoParticipants);
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&value[0..8]);
        Ok(u64::from_le_bytes(bytes) % self.total_entries)
    }

    /// Guards checked before the oracle value is read.
    pub fn check_reveal(&self, randomness: Pubkey, now: i64) -> Result<()> {
        self.check_drawable(now)?;
        require!(
            self.randomness_account == Some(randomness),
            RaffleError::InvalidRandomnessAccount
        );
        Ok(())
    }

    /// Picks the winner from a revealed value and completes the raffle.
    /// Returns the winner and the winning ticket index.
    pub fn settle_draw(
        &mut self,
        randomness: Pubkey,
        value: &[u8; 32],
        now: i64,
    ) -> Result<(Pubkey, u64)> {
        self.check_reveal(randomness, now)?;

        let index = self.winner_index(value)?;
        let winner = self
            .participant_at(index)
            .ok_or(RaffleError::NoParticipants)?;

        self.winner = Some(winner);
        self.status = RaffleStatus::Completed;
        self.claimed = true;
        self.delivery_status = DeliveryStatus::Pending;

        Ok((winner, index))
    }

    /// Moves an undersubscribed raffle past its deadline into `Refunded`.
    /// Returns `true` when this call made the transition; a raffle that is
    /// already refunding is left as is so the crank can continue.
    pub fn begin_refund(&mut self, now: i64) -> Result<bool> {
        match self.status {
            RaffleStatus::Refunded => Ok(false),
            RaffleStatus::Active => {
                require!(now > self.deadline, RaffleError::CannotDrawYet);
                require!(
                    self.total_entries < self.min_tickets as u64,
                    RaffleError::MinTicketsReached
                );
                self.status = RaffleStatus::Refunded;
                Ok(true)
            }
            _ => Err(RaffleError::InvalidStatus.into()),
        }
    }

    /// Next run owed a refund and its amount. Advances the cursor.
    pub fn next_refund(&mut self) -> Result<Option<(TicketRun, u64)>> {
        require!(
            self.status == RaffleStatus::Refunded,
            RaffleError::InvalidStatus
        );
        let run = match self.participants.get(self.refund_cursor as usize) {
            Some(run) => *run,
            None => return Ok(None),
        };
        let amount = (run.count as u64)
            .checked_mul(self.ticket_price)
            .ok_or(RaffleError::Overflow)?;
        self.refund_cursor = self
            .refund_cursor
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;
        Ok(Some((run, amount)))
    }

    pub fn refunds_complete(&self) -> bool {
        self.refund_cursor as usize >= self.participants.len()
    }

    pub fn cancel(&mut self) -> Result<()> {
        require!(
            self.status == RaffleStatus::Active,
            RaffleError::RaffleNotActive
        );
        require!(self.total_entries == 0, RaffleError::RaffleHasEntries);
        self.status = RaffleStatus::Cancelled;
        Ok(())
    }

    /// Seller ships the prize. Opens the dispute window. Returns the winner.
    pub fn mark_shipped(&mut self, tracking_info: Option<String>, now: i64) -> Result<Pubkey> {
        require!(
            self.status == RaffleStatus::Completed,
            RaffleError::InvalidStatus
        );
        let winner = self.winner.ok_or(RaffleError::InvalidStatus)?;
        require!(
            self.delivery_status == DeliveryStatus::Pending,
            RaffleError::InvalidDeliveryStatus
        );
        check_tracking_info(&tracking_info)?;

        self.tracking_info = tracking_info;
        self.delivery_status = DeliveryStatus::Shipped;
        self.shipped_at = Some(now);
        self.dispute_deadline = Some(
            now.checked_add(DISPUTE_WINDOW_SECONDS)
                .ok_or(RaffleError::Overflow)?,
        );
        Ok(winner)
    }

    pub fn mark_delivered(
        &mut self,
        caller: &Pubkey,
        tracking_info: Option<String>,
    ) -> Result<()> {
        require!(self.winner == Some(*caller), RaffleError::NotWinner);
        require!(
            self.delivery_status == DeliveryStatus::Shipped,
            RaffleError::InvalidDeliveryStatus
        );
        check_tracking_info(&tracking_info)?;

        if tracking_info.is_some() {
            self.tracking_info = tracking_info;
        }
        self.delivery_status = DeliveryStatus::Delivered;
        Ok(())
    }

    pub fn open_dispute(&mut self, caller: &Pubkey, now: i64) -> Result<()> {
        require!(self.winner == Some(*caller), RaffleError::NotWinner);
        require!(
            matches!(
                self.delivery_status,
                DeliveryStatus::Shipped | DeliveryStatus::Delivered
            ),
            RaffleError::InvalidDeliveryStatus
        );
        let deadline = self
            .dispute_deadline
            .ok_or(RaffleError::InvalidDeliveryStatus)?;
        require!(now <= deadline, RaffleError::DisputeWindowClosed);

        self.delivery_status = DeliveryStatus::Disputed;
        Ok(())
    }

    pub fn resolve_dispute(&mut self) -> Result<()> {
        require!(
            self.delivery_status == DeliveryStatus::Disputed,
            RaffleError::InvalidDeliveryStatus
        );
        self.delivery_status = DeliveryStatus::Resolved;
        Ok(())
    }
}

fn check_tracking_info(tracking_info: &Option<String>) -> Result<()> {
    if let Some(info) = tracking_info {
        require!(
            info.len() <= MAX_TRACKING_INFO_LEN,
            RaffleError::TrackingInfoTooLong
        );
    }
    Ok(())
}
