pub mod buy_tickets;
pub mod cancel_raffle;
pub mod create_raffle;
pub mod delivery;
pub mod draw_winner;
pub mod initialize_counter;
pub mod refund_tickets;
pub mod request_draw;

pub use buy_tickets::*;
pub use cancel_raffle::*;
pub use create_raffle::*;
pub use delivery::*;
pub use draw_winner::*;
pub use initialize_counter::*;
pub use refund_tickets::*;
pub use request_draw::*;
