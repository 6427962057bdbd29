use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{COUNTER_SEED, RAFFLE_SEED};
use crate::error::RaffleError;
use crate::events::DrawRequested;
use crate::state::{Counter, RaffleAccount};

/// Accounts required to commit a randomness request to a raffle.
///
/// Ensures:
/// 1. Only the program authority can commit.
/// 2. The raffle is past its deadline with enough entries to draw.
/// 3. The randomness request was seeded on the previous slot, so its value
///    cannot be known yet.
#[derive(Accounts)]
pub struct RequestDraw<'info> {
    /// The program authority (the keeper).
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [COUNTER_SEED],
        bump = counter.bump,
        constraint = counter.authority == authority.key() @ RaffleError::Unauthorized,
    )]
    pub counter: Account<'info, Counter>,

    /// The raffle to draw.
    #[account(
        mut,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

pub fn process_request_draw(ctx: Context<RequestDraw>) -> Result<()> {
    let clock = Clock::get()?;
    let randomness_key = ctx.accounts.randomness_account_data.key();

    let seed_slot = {
        let randomness_data =
            RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
                .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
        randomness_data.seed_slot
    };

    let raffle = &mut ctx.accounts.raffle_account;
    raffle.commit_randomness(randomness_key, seed_slot, clock.slot, clock.unix_timestamp)?;

    msg!(
        "Raffle {} committed to randomness {} (seed slot {})",
        raffle.raffle_id,
        randomness_key,
        seed_slot
    );

    emit!(DrawRequested {
        raffle: raffle.key(),
        randomness: randomness_key,
    });

    Ok(())
}
