use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{ESCROW_SEED, RAFFLE_SEED};
use crate::error::RaffleError;
use crate::events::TicketsBought;
use crate::state::RaffleAccount;

/// Accounts required to buy tickets.
#[derive(Accounts)]
pub struct BuyTickets<'info> {
    /// The account paying for the tickets.
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// Buyer's token account in the raffle's payment mint.
    #[account(
        mut,
        constraint = buyer_token_account.mint == raffle_account.payment_mint @ RaffleError::InvalidPaymentMint,
        constraint = buyer_token_account.owner == buyer.key() @ RaffleError::Unauthorized,
    )]
    pub buyer_token_account: Account<'info, TokenAccount>,

    /// The raffle being entered.
    #[account(
        mut,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,

    /// Escrow that receives the ticket payment.
    #[account(
        mut,
        seeds = [ESCROW_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.escrow_bump,
    )]
    pub escrow_payment_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Buys `num_tickets` tickets for the signer.
///
/// Steps performed:
/// 1. Check the raffle is active, before its deadline and has room.
/// 2. Book the entries (checked arithmetic throughout).
/// 3. Transfer the full cost from the buyer into escrow in one transfer.
///
/// A failed transfer fails the whole transaction, so the booking in step 2
/// never survives without the payment.
pub fn process_buy_tickets(ctx: Context<BuyTickets>, num_tickets: u32) -> Result<()> {
    let clock = Clock::get()?;
    let buyer = ctx.accounts.buyer.key();

    let raffle = &mut ctx.accounts.raffle_account;
    let cost = raffle.record_purchase(buyer, num_tickets, clock.unix_timestamp)?;
    let total_entries = raffle.total_entries;
    let raffle_key = raffle.key();

    msg!(
        "Bought: {}, New total: {}, Max: {}",
        num_tickets,
        total_entries,
        raffle.max_tickets
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer_token_account.to_account_info(),
                to: ctx.accounts.escrow_payment_account.to_account_info(),
                authority: ctx.accounts.buyer.to_account_info(),
            },
        ),
        cost,
    )?;

    emit!(TicketsBought {
        buyer,
        raffle: raffle_key,
        num_tickets,
        total_entries,
    });

    Ok(())
}
