use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{ESCROW_SEED, RAFFLE_SEED};
use crate::error::RaffleError;
use crate::events::{RaffleRefunded, TicketsRefunded};
use crate::state::RaffleAccount;

/// Accounts required to refund an undersubscribed raffle.
///
/// Remaining accounts: one token account per participant run, in run order,
/// starting at `raffle_account.refund_cursor`. Any number of runs can be paid
/// per call; the crank can be repeated until every run is refunded.
#[derive(Accounts)]
pub struct RefundTickets<'info> {
    /// Anyone may crank refunds; funds only ever go back to the buyers.
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [RAFFLE_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.bump,
    )]
    pub raffle_account: Box<Account<'info, RaffleAccount>>,

    #[account(
        mut,
        seeds = [ESCROW_SEED, raffle_account.seller.as_ref(), &raffle_account.raffle_id.to_le_bytes()],
        bump = raffle_account.escrow_bump,
    )]
    pub escrow_payment_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Refunds buyers of a raffle that missed `min_tickets` by its deadline.
///
/// The first call flips the raffle to `Refunded`; from then on the branch is
/// fixed and later calls only continue paying runs.
pub fn process_refund_tickets<'info>(
    ctx: Context<'_, '_, 'info, 'info, RefundTickets<'info>>,
) -> Result<()> {
    let clock = Clock::get()?;
    let raffle_key = ctx.accounts.raffle_account.key();

    let raffle = &mut ctx.accounts.raffle_account;
    if raffle.begin_refund(clock.unix_timestamp)? {
        msg!(
            "Raffle {} refunding: {} of {} tickets sold",
            raffle.raffle_id,
            raffle.total_entries,
            raffle.min_tickets
        );
        emit!(RaffleRefunded {
            raffle: raffle_key,
            total_entries: raffle.total_entries,
            min_tickets: raffle.min_tickets,
        });
    }

    let seller = raffle.seller;
    let payment_mint = raffle.payment_mint;
    let id_bytes = raffle.raffle_id.to_le_bytes();
    let bump = [raffle.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[RAFFLE_SEED, seller.as_ref(), &id_bytes, &bump]];

    let mut refunded: u32 = 0;
    for buyer_info in ctx.remaining_accounts.iter() {
        let (run, amount) = match ctx.accounts.raffle_account.next_refund()? {
            Some(next) => next,
            None => break,
        };

        let buyer_token_account: Account<TokenAccount> = Account::try_from(buyer_info)?;
        require_keys_eq!(
            buyer_token_account.owner,
            run.buyer,
            RaffleError::RefundAccountMismatch
        );
        require_keys_eq!(
            buyer_token_account.mint,
            payment_mint,
            RaffleError::InvalidPaymentMint
        );

        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.escrow_payment_account.to_account_info(),
                    to: buyer_info.clone(),
                    authority: ctx.accounts.raffle_account.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )?;

        emit!(TicketsRefunded {
            raffle: raffle_key,
            buyer: run.buyer,
            amount,
        });
        refunded = refunded.checked_add(1).ok_or(RaffleError::Overflow)?;
    }

    let raffle = &ctx.accounts.raffle_account;
    msg!(
        "Refunded {} runs, {}/{} done",
        refunded,
        raffle.refund_cursor,
        raffle.participants.len()
    );

    Ok(())
}
