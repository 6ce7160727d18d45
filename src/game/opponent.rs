//! The bot's side of a round

use super::Move;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

impl Distribution<Move> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Move {
        Move::from_ordinal(rng.gen_range(0..3))
    }
}

/// Source of the bot's moves
pub trait Opponent: Send + Sync {
    fn next_move(&self) -> Move;
}

/// Uniform opponent backed by the thread-local, OS-seeded generator
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOpponent;

impl Opponent for RandomOpponent {
    fn next_move(&self) -> Move {
        rand::thread_rng().gen()
    }
}
