use anchor_lang::prelude::*;

use crate::constants::{COUNTER_SEED, RAFFLE_SEED};
use crate::error::RaffleError;
use crate::events::{DisputeOpened, DisputeResolved, ProductDelivered, ProductShipped};
use crate::state::{Counter, RaffleAccount};

/// Accounts for the seller marking the prize as shipped.
#[derive(Accounts)]
pub struct MarkShipped<'info> {
    pub seller: Signer<'info>,

    #[account(
        mut,
        has_one = seller @ RaffleError::NotSeller,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,
}

/// Accounts for the winner confirming delivery or opening a dispute.
#[derive(Accounts)]
pub struct WinnerAction<'info> {
    pub winner: Signer<'info>,

    #[account(
        mut,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,
}

/// Accounts for the program authority settling a dispute.
#[derive(Accounts)]
pub struct ResolveDispute<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [COUNTER_SEED],
        bump = counter.bump,
        constraint = counter.authority == authority.key() @ RaffleError::Unauthorized,
    )]
    pub counter: Account<'info, Counter>,

    #[account(
        mut,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,
}

/// Marks the prize shipped and starts the dispute window.
///
/// # Arguments
/// * `ctx` - Context holding the MarkShipped accounts
/// * `tracking_info` - optional carrier reference, at most 64 bytes
pub fn process_mark_shipped(ctx: Context<MarkShipped>, tracking_info: Option<String>) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle_account;
    let winner = raffle.mark_shipped(tracking_info, clock.unix_timestamp)?;

    emit!(ProductShipped {
        raffle: raffle.key(),
        winner,
        shipped_at: clock.unix_timestamp,
    });
    Ok(())
}

pub fn process_mark_delivered(
    ctx: Context<WinnerAction>,
    tracking_info: Option<String>,
) -> Result<()> {
    let clock = Clock::get()?;
    let winner = ctx.accounts.winner.key();
    let raffle = &mut ctx.accounts.raffle_account;
    raffle.mark_delivered(&winner, tracking_info)?;

    emit!(ProductDelivered {
        raffle: raffle.key(),
        winner,
        delivered_at: clock.unix_timestamp,
    });
    Ok(())
}

pub fn process_open_dispute(ctx: Context<WinnerAction>) -> Result<()> {
    let clock = Clock::get()?;
    let winner = ctx.accounts.winner.key();
    let raffle = &mut ctx.accounts.raffle_account;
    raffle.open_dispute(&winner, clock.unix_timestamp)?;

    msg!("Dispute opened on raffle {}", raffle.raffle_id);
    emit!(DisputeOpened {
        raffle: raffle.key(),
        winner,
        opened_at: clock.unix_timestamp,
    });
    Ok(())
}

pub fn process_resolve_dispute(ctx: Context<ResolveDispute>) -> Result<()> {
    let raffle = &mut ctx.accounts.raffle_account;
    raffle.resolve_dispute()?;

    emit!(DisputeResolved {
        raffle: raffle.key(),
        resolved_by: ctx.accounts.authority.key(),
    });
    Ok(())
}
