use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{COUNTER_SEED, ESCROW_SEED, RAFFLE_SEED};
use crate::error::RaffleError;
use crate::events::WinnerDrawn;
use crate::state::{Counter, RaffleAccount};

/// Accounts required to reveal the committed randomness and settle a raffle.
///
/// This ensures that:
/// 1. Only the program authority can draw.
/// 2. The randomness account provided is the one committed to the raffle.
/// 3. The raffle deadline has passed and enough tickets were sold.
/// 4. A winner hasn't already been chosen.
#[derive(Accounts)]
pub struct DrawWinner<'info> {
    /// The program authority (the keeper).
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [COUNTER_SEED],
        bump = counter.bump,
        constraint = counter.authority == authority.key() @ RaffleError::Unauthorized,
    )]
    pub counter: Account<'info, Counter>,

    /// The raffle being settled.
    #[account(
        mut,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,

    /// Escrow holding the ticket proceeds.
    #[account(
        mut,
        seeds = [ESCROW_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.escrow_bump,
    )]
    pub escrow_payment_account: Account<'info, TokenAccount>,

    /// Seller's token account that receives the proceeds.
    #[account(
        mut,
        constraint = seller_token_account.owner == raffle_account.seller @ RaffleError::NotSeller,
        constraint = seller_token_account.mint == raffle_account.payment_mint @ RaffleError::InvalidPaymentMint,
    )]
    pub seller_token_account: Account<'info, TokenAccount>,

    /// The randomness oracle account providing verifiable randomness.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Reads the revealed value, picks `participants[value mod total_entries]`,
/// completes the raffle and releases the escrow to the seller.
///
/// Raffle state is checked before the oracle account is read, so a settled
/// raffle reports `InvalidStatus` whatever slot the request was revealed in.
/// The reveal instruction must run earlier in the same slot; a value revealed
/// in an older slot is rejected as too old.
pub fn process_draw_winner(ctx: Context<DrawWinner>) -> Result<()> {
    let clock = Clock::get()?;
    let randomness_key = ctx.accounts.randomness_account_data.key();

    ctx.accounts
        .raffle_account
        .check_reveal(randomness_key, clock.unix_timestamp)?;

    let revealed_random_value = {
        let randomness_data =
            RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
                .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
        require!(
            randomness_data.reveal_slot != 0,
            RaffleError::RandomnessNotResolved
        );
        randomness_data
            .get_value(&clock)
            .map_err(|_| RaffleError::RandomnessTooOld)?
    };

    let raffle = &mut ctx.accounts.raffle_account;
    let (winner, winner_index) =
        raffle.settle_draw(randomness_key, &revealed_random_value, clock.unix_timestamp)?;

    msg!("Ticket num: {}", raffle.total_entries);
    msg!("Winner: {} (ticket {})", winner, winner_index);

    let payout = raffle.total_collected;
    let raffle_key = raffle.key();
    let seller = raffle.seller;
    let id_bytes = raffle.raffle_id.to_le_bytes();
    let bump = [raffle.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[RAFFLE_SEED, seller.as_ref(), &id_bytes, &bump]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.escrow_payment_account.to_account_info(),
                to: ctx.accounts.seller_token_account.to_account_info(),
                authority: ctx.accounts.raffle_account.to_account_info(),
            },
            signer_seeds,
        ),
        payout,
    )?;

    emit!(WinnerDrawn {
        raffle: raffle_key,
        winner,
        winner_index,
        payout,
    });

    Ok(())
}
