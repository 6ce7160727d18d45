//! Pure state transition function

use super::{Effect, Event, ScreenState};
use crate::screen::{Greeting, NoticeKind, Screen};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, PartialEq)]
pub struct TransitionResult {
    pub new_state: ScreenState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ScreenState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs, it always produces the same outputs, with no I/O.
pub fn transition(state: ScreenState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Registration
        // ============================================================

        // Start is accepted everywhere; the menu follows once the user exists
        (state, Event::Start) => Ok(TransitionResult::new(state).with_effect(Effect::EnsureUser)),

        (_, Event::UserReady) => Ok(TransitionResult::new(ScreenState::MainMenu)
            .with_effect(Effect::show(Screen::MainMenu(Greeting::Welcome)))),

        (state, Event::UserSetupFailed(_)) => {
            Ok(TransitionResult::new(state).with_effect(Effect::notice(NoticeKind::Failure)))
        }

        // ============================================================
        // Playing a round
        // ============================================================
        (ScreenState::MainMenu, Event::Play) => Ok(TransitionResult::new(ScreenState::MovePicker)
            .with_effect(Effect::show(Screen::MovePicker))),

        (ScreenState::MovePicker, Event::MoveChosen(player_move)) => {
            Ok(TransitionResult::new(ScreenState::Result)
                .with_effect(Effect::PlayRound { player_move }))
        }

        // Result is shown, then the menu right after it
        (ScreenState::Result, Event::RoundPlayed(round)) => {
            Ok(TransitionResult::new(ScreenState::MainMenu)
                .with_effect(Effect::show(Screen::RoundResult(round)))
                .with_effect(Effect::show(Screen::MainMenu(Greeting::PlayAgain))))
        }

        (ScreenState::Result, Event::RoundFailed(err)) => {
            Ok(TransitionResult::new(ScreenState::MainMenu)
                .with_effect(Effect::notice(NoticeKind::for_round_error(&err)))
                .with_effect(Effect::show(Screen::MainMenu(Greeting::Plain))))
        }

        // ============================================================
        // Stats
        // ============================================================
        (ScreenState::MainMenu, Event::ShowStats) => {
            Ok(TransitionResult::new(ScreenState::MainMenu).with_effect(Effect::LoadStats))
        }

        (ScreenState::MainMenu, Event::StatsLoaded(stats)) => {
            Ok(TransitionResult::new(ScreenState::MainMenu)
                .with_effect(Effect::show(Screen::Stats(stats)))
                .with_effect(Effect::show(Screen::MainMenu(Greeting::Plain))))
        }

        (ScreenState::MainMenu, Event::StatsUnavailable(err)) => {
            let kind = match NoticeKind::for_round_error(&err) {
                NoticeKind::NotRegistered => NoticeKind::NotRegistered,
                _ => NoticeKind::StatsUnavailable,
            };
            Ok(TransitionResult::new(ScreenState::MainMenu).with_effect(Effect::notice(kind)))
        }

        // ============================================================
        // Unrecognized input never advances the state
        // ============================================================
        (state, Event::UnknownCommand(_)) => Ok(TransitionResult::new(state)
            .with_effect(Effect::notice(NoticeKind::UnknownCommand))),

        (state, Event::UnknownAction(_)) => {
            Ok(TransitionResult::new(state).with_effect(Effect::notice(NoticeKind::TryAgain)))
        }

        (state, event) => Err(TransitionError::InvalidTransition(format!(
            "{} while in {state:?}",
            event.name()
        ))),
    }
}
