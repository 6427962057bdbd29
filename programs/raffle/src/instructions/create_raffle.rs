use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{COUNTER_SEED, ESCROW_SEED, RAFFLE_SEED};
use crate::events::RaffleCreated;
use crate::state::{Counter, RaffleAccount, RaffleTerms};

/// Accounts required to open a raffle.
///
/// The raffle record and its escrow token account are both derived from
/// `(seller, counter.next_id)` and created in the same transaction, with the
/// seller paying rent for both.
#[derive(Accounts)]
pub struct CreateRaffle<'info> {
    /// The seller opening the raffle. Pays for both accounts.
    #[account(mut)]
    pub seller: Signer<'info>,

    /// Global counter; its current value becomes this raffle's id.
    #[account(
        mut,
        seeds = [COUNTER_SEED],
        bump = counter.bump,
    )]
    pub counter: Account<'info, Counter>,

    /// Payment token mint (USDC, wrapped SOL, etc.)
    pub payment_mint: Account<'info, Mint>,

    /// The raffle record.
    #[account(
        init,
        payer = seller,
        space = 8 + RaffleAccount::INIT_SPACE,
        seeds = [RAFFLE_SEED, seller.key().as_ref(), &counter.next_id.to_le_bytes()],
        bump
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,

    /// Escrow token account. Its only authority is the raffle PDA, so funds
    /// move out only through this program.
    #[account(
        init,
        payer = seller,
        seeds = [ESCROW_SEED, seller.key().as_ref(), &counter.next_id.to_le_bytes()],
        bump,
        token::mint = payment_mint,
        token::authority = raffle_account,
    )]
    pub escrow_payment_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Opens a raffle.
///
/// # Arguments
/// * `ctx` - Context holding the CreateRaffle accounts
/// * `terms` - item description, prices (base units, 6 decimals), ticket bounds and deadline
pub fn process_create_raffle(ctx: Context<CreateRaffle>, terms: RaffleTerms) -> Result<()> {
    let clock = Clock::get()?;
    terms.validate(clock.unix_timestamp)?;

    let raffle_id = ctx.accounts.counter.allocate()?;
    let seller = ctx.accounts.seller.key();
    let ticket_price = terms.ticket_price;
    let deadline = terms.deadline;

    let raffle = &mut ctx.accounts.raffle_account;
    raffle.set_inner(RaffleAccount::open(
        raffle_id,
        seller,
        ctx.accounts.payment_mint.key(),
        terms,
        ctx.bumps.raffle_account,
        ctx.bumps.escrow_payment_account,
    ));

    msg!("Raffle {} created by {}", raffle_id, seller);

    emit!(RaffleCreated {
        raffle: raffle.key(),
        seller,
        ticket_price,
        deadline,
    });
    Ok(())
}
