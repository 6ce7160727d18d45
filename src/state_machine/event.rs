//! Events that can occur in a chat

use crate::game::{Move, Round};
use crate::screen::{PLAY_ACTION, STATS_ACTION};
use crate::stats::{StatsError, UserStats};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // User events
    Start,
    Play,
    ShowStats,
    MoveChosen(Move),
    UnknownCommand(String),
    UnknownAction(String),

    // Effect results
    UserReady,
    UserSetupFailed(StatsError),
    RoundPlayed(Round),
    RoundFailed(StatsError),
    StatsLoaded(UserStats),
    StatsUnavailable(StatsError),
}

impl Event {
    /// Classify the text of an incoming message.
    ///
    /// Only `/start` is a known command; `/start@botname` and trailing
    /// arguments are accepted. Everything else is an unknown command.
    pub fn from_message_text(text: &str) -> Self {
        let command = text
            .trim()
            .strip_prefix('/')
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|word| word.split('@').next());

        match command {
            Some(name) if name.eq_ignore_ascii_case("start") => Event::Start,
            _ => Event::UnknownCommand(text.to_string()),
        }
    }

    /// Classify the data of a pressed inline button
    pub fn from_callback_data(data: &str) -> Self {
        match data {
            PLAY_ACTION => Event::Play,
            STATS_ACTION => Event::ShowStats,
            other => Move::parse(other).map_or_else(
                || Event::UnknownAction(other.to_string()),
                Event::MoveChosen,
            ),
        }
    }

    /// Check if the event came from the user rather than an effect
    pub fn is_inbound(&self) -> bool {
        matches!(
            self,
            Event::Start
                | Event::Play
                | Event::ShowStats
                | Event::MoveChosen(_)
                | Event::UnknownCommand(_)
                | Event::UnknownAction(_)
        )
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Play => "play",
            Event::ShowStats => "show_stats",
            Event::MoveChosen(_) => "move_chosen",
            Event::UnknownCommand(_) => "unknown_command",
            Event::UnknownAction(_) => "unknown_action",
            Event::UserReady => "user_ready",
            Event::UserSetupFailed(_) => "user_setup_failed",
            Event::RoundPlayed(_) => "round_played",
            Event::RoundFailed(_) => "round_failed",
            Event::StatsLoaded(_) => "stats_loaded",
            Event::StatsUnavailable(_) => "stats_unavailable",
        }
    }
}
