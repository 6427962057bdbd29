use anchor_lang::prelude::*;

use crate::constants::COUNTER_SEED;
use crate::state::Counter;

/// Accounts required to create the global raffle id counter.
/// The signer becomes the program authority that drives draws.
#[derive(Accounts)]
pub struct InitializeCounter<'info> {
    /// The account paying for account creation and fees.
    #[account(mut)]
    pub signer: Signer<'info>,

    /// The counter PDA. Created on the first call; a second call finds it
    /// initialized and fails with `AlreadyInitialized`.
    #[account(
        init_if_needed,
        payer = signer,
        space = 8 + Counter::INIT_SPACE,
        seeds = [COUNTER_SEED],
        bump
    )]
    pub counter: Account<'info, Counter>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

pub fn process_initialize_counter(ctx: Context<InitializeCounter>) -> Result<()> {
    let authority = ctx.accounts.signer.key();
    ctx.accounts
        .counter
        .initialize(authority, ctx.bumps.counter)?;

    msg!("Counter initialized, authority: {}", authority);
    Ok(())
}
