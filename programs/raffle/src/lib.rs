use anchor_lang::prelude::*;
use instructions::*;

/// Program-wide constants: PDA seeds, string bounds, participant capacity
/// and the dispute window.
pub mod constants;

/// Custom error types returned through the Anchor framework when
/// instructions fail.
pub mod error;

/// Events emitted on every raffle state transition.
pub mod events;

/// All instruction handlers for the program, such as creating a raffle,
/// buying tickets, committing randomness and drawing a winner.
pub mod instructions;

/// On-chain account structures (`Counter`, `RaffleAccount`) and the pure
/// state transitions the handlers and the keeper share.
pub mod state;

use state::RaffleTerms;

declare_id!("5CmMWJpHYhPjmhCXaaLU2WskBBB5HJ4yzDv6JzXEiDnz");

#[program]
pub mod raffle {
    use super::*;

    pub fn initialize_counter(ctx: Context<InitializeCounter>) -> Result<()> {
        process_initialize_counter(ctx)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_raffle(
        ctx: Context<CreateRaffle>,
        item_name: String,
        item_description: String,
        item_image_uri: String,
        selling_price: u64,
        ticket_price: u64,
        min_tickets: u32,
        max_tickets: u32,
        deadline: i64,
    ) -> Result<()> {
        process_create_raffle(
            ctx,
            RaffleTerms {
                item_name,
                item_description,
                item_image_uri,
                selling_price,
                ticket_price,
                min_tickets,
                max_tickets,
                deadline,
            },
        )
    }

    pub fn buy_tickets(ctx: Context<BuyTickets>, num_tickets: u32) -> Result<()> {
        process_buy_tickets(ctx, num_tickets)
    }

    pub fn request_draw(ctx: Context<RequestDraw>) -> Result<()> {
        process_request_draw(ctx)
    }

    pub fn draw_winner(ctx: Context<DrawWinner>) -> Result<()> {
        process_draw_winner(ctx)
    }

    pub fn refund_tickets<'info>(
        ctx: Context<'_, '_, 'info, 'info, RefundTickets<'info>>,
    ) -> Result<()> {
        process_refund_tickets(ctx)
    }

    pub fn cancel_raffle(ctx: Context<CancelRaffle>) -> Result<()> {
        process_cancel_raffle(ctx)
    }

    pub fn mark_shipped(ctx: Context<MarkShipped>, tracking_info: Option<String>) -> Result<()> {
        process_mark_shipped(ctx, tracking_info)
    }

    pub fn mark_delivered(
        ctx: Context<WinnerAction>,
        tracking_info: Option<String>,
    ) -> Result<()> {
        process_mark_delivered(ctx, tracking_info)
    }

    pub fn open_dispute(ctx: Context<WinnerAction>) -> Result<()> {
        process_open_dispute(ctx)
    }

    pub fn resolve_dispute(ctx: Context<ResolveDispute>) -> Result<()> {
        process_resolve_dispute(ctx)
    }
}
