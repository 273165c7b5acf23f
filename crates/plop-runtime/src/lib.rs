//! Command execution engine: aggregation queries, the dispatcher state
//! machine, the rarity draw, and the broadcast reminder sweep.

pub mod aggregate;
pub mod dispatch;
pub mod draw;
pub mod reminder;
pub mod replies;

pub use aggregate::{leaderboard, self_count};
pub use dispatch::{DispatchOutcome, Dispatcher, InboundMessage};
pub use draw::{draw_tier, RarityTier, DRAW_TABLE};
pub use reminder::run_reminder_sweep;

#[cfg(test)]
mod test_support;
