//! Outbound screens and how they render
//!
//! A screen is one message shown to the user. Its [`Retention`] decides how
//! it interacts with the chat's live message.

use crate::game::{Move, Outcome, Round};
use crate::stats::{StatsError, UserStats};
use serde::{Deserialize, Serialize};

pub const PLAY_ACTION: &str = "play";
pub const STATS_ACTION: &str = "stats";

/// How a screen treats the chat's live message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Replaces the live message and becomes it
    Live,
    /// Replaces the live message, then stays in the history untracked
    Transcript,
    /// Leaves the live message alone and is not tracked
    Notice,
}

/// Greeting shown above the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    Welcome,
    PlayAgain,
    /// Just the menu prompt
    Plain,
}

/// Why a notice is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    UnknownCommand,
    /// Unrecognized or out-of-place button
    TryAgain,
    /// User row is missing; `/start` will recreate it
    NotRegistered,
    StatsUnavailable,
    Failure,
}

impl NoticeKind {
    /// Map a stats failure to what the user should see
    pub fn for_round_error(err: &StatsError) -> Self {
        match err {
            StatsError::UserNotFound(_) => NoticeKind::NotRegistered,
            StatsError::PersistenceFailure(_) => NoticeKind::Failure,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    MainMenu(Greeting),
    MovePicker,
    RoundResult(Round),
    Stats(UserStats),
    Notice(NoticeKind),
}

/// One inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Transport-neutral rendering of a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    pub text: String,
    /// Rows of buttons; empty means no keyboard
    pub keyboard: Vec<Vec<Button>>,
}

impl ScreenView {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: vec![],
        }
    }
}

impl Screen {
    pub fn retention(&self) -> Retention {
        match self {
            Screen::MainMenu(_) | Screen::MovePicker => Retention::Live,
            Screen::RoundResult(_) | Screen::Stats(_) => Retention::Transcript,
            Screen::Notice(_) => Retention::Notice,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Screen::MainMenu(_) => "main_menu",
            Screen::MovePicker => "move_picker",
            Screen::RoundResult(_) => "round_result",
            Screen::Stats(_) => "stats",
            Screen::Notice(_) => "notice",
        }
    }

    pub fn render(&self) -> ScreenView {
        match self {
            Screen::MainMenu(greeting) => {
                let prefix = match greeting {
                    Greeting::Welcome => {
                        "Welcome!\n\nHere you can play rock-paper-scissors against the bot.\n"
                    }
                    Greeting::PlayAgain => "Play again?\n",
                    Greeting::Plain => "",
                };
                ScreenView {
                    text: format!("{prefix}Choose an option:"),
                    keyboard: vec![vec![
                        Button::new("🎲 Play", PLAY_ACTION),
                        Button::new("📈 My stats", STATS_ACTION),
                    ]],
                }
            }
            Screen::MovePicker => ScreenView {
                text: "Choose your move:".to_string(),
                keyboard: vec![Move::ALL
                    .iter()
                    .map(|m| Button::new(m.emoji(), m.as_str()))
                    .collect()],
            },
            Screen::RoundResult(round) => {
                let headline = match round.outcome {
                    Outcome::Draw => "Draw!",
                    Outcome::PlayerWin => "You won!",
                    Outcome::BotWin => "You lost!",
                };
                ScreenView::text(format!(
                    "{headline}\nYour move: {}\nBot's move: {}",
                    round.player_move, round.bot_move
                ))
            }
            Screen::Stats(stats) => ScreenView::text(format!(
                "📊 Your stats:\n\n✅ Wins: {}\n❌ Defeats: {}\n🤝 Draws: {}\n#️⃣ Win ratio: {:.2}",
                stats.wins,
                stats.defeats,
                stats.draws,
                stats.win_ratio()
            )),
            Screen::Notice(kind) => ScreenView::text(match kind {
                NoticeKind::UnknownCommand => "Unknown command.",
                NoticeKind::TryAgain | NoticeKind::Failure => {
                    "Something went wrong. Please try again."
                }
                NoticeKind::NotRegistered => "I don't know you yet. Send /start and try again.",
                NoticeKind::StatsUnavailable => "Could not load your stats.",
            }),
        }
    }
}
