//! Moves and outcome resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// A move, identified by its ordinal.
///
/// The ordinals are laid out so that move `i` beats move `(i + 1) % 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock = 0,
    Scissors = 1,
    Paper = 2,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Scissors, Move::Paper];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Wraps modulo 3, so every integer names a move
    pub fn from_ordinal(ordinal: u8) -> Self {
        Self::ALL[usize::from(ordinal % 3)]
    }

    /// The move this one beats
    pub fn beats(self) -> Move {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// The move this one loses to
    pub fn loses_to(self) -> Move {
        Self::from_ordinal(self.ordinal() + 2)
    }

    /// Callback data carried by the move's button
    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Scissors => "scissors",
            Move::Paper => "paper",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Move::Rock => "👊",
            Move::Scissors => "✌️",
            Move::Paper => "✋",
        }
    }

    /// Parse button data. Accepts the move name or its emoji.
    pub fn parse(data: &str) -> Option<Self> {
        let data = data.trim();
        Self::ALL
            .into_iter()
            .find(|m| data.eq_ignore_ascii_case(m.as_str()) || data == m.emoji())
            .or_else(|| {
                // Some clients strip the variation selector from ✌️
                (data == "✌").then_some(Move::Scissors)
            })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

/// Result of one round, from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Draw,
    PlayerWin,
    BotWin,
}

/// Resolve a round. Total over all nine pairs.
pub fn resolve(player: Move, bot: Move) -> Outcome {
    match (3 + bot.ordinal() - player.ordinal()) % 3 {
        0 => Outcome::Draw,
        1 => Outcome::PlayerWin,
        _ => Outcome::BotWin,
    }
}

/// A completed round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub player_move: Move,
    pub bot_move: Move,
    pub outcome: Outcome,
}

impl Round {
    pub fn play(player_move: Move, bot_move: Move) -> Self {
        Self {
            player_move,
            bot_move,
            outcome: resolve(player_move, bot_move),
        }
    }
}
