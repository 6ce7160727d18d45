//! Rock-paper-scissors rules
//!
//! Move representation, outcome resolution, and the bot's opponent.

mod moves;
mod opponent;

pub use moves::{resolve, Move, Outcome, Round};
pub use opponent::{Opponent, RandomOpponent};
