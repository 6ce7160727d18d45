//! Effects produced by state transitions

use crate::game::Move;
use crate::screen::{NoticeKind, Screen};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Create the user row if it is missing
    EnsureUser,

    /// Draw the bot's move, resolve, and record the outcome
    PlayRound { player_move: Move },

    /// Read the user's counters
    LoadStats,

    /// Send a screen, honoring its retention
    ShowScreen(Screen),
}

impl Effect {
    pub fn show(screen: Screen) -> Self {
        Effect::ShowScreen(screen)
    }

    pub fn notice(kind: NoticeKind) -> Self {
        Effect::ShowScreen(Screen::Notice(kind))
    }
}
