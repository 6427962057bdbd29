use anchor_lang::prelude::*;

use crate::constants::RAFFLE_SEED;
use crate::error::RaffleError;
use crate::events::RaffleCancelled;
use crate::state::RaffleAccount;

#[derive(Accounts)]
pub struct CancelRaffle<'info> {
    pub seller: Signer<'info>,

    #[account(
        mut,
        has_one = seller @ RaffleError::NotSeller,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,
}

/// Withdraws a raffle nobody has entered. The escrow is empty, so nothing moves.
pub fn process_cancel_raffle(ctx: Context<CancelRaffle>) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle_account;
    raffle.cancel()?;

    emit!(RaffleCancelled {
        raffle: raffle.key(),
        seller: raffle.seller,
    });
    Ok(())
}
