//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::game::{Move, Round};
use crate::screen::{Retention, Screen};
use crate::stats::{StatsError, UserStats};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Rock), Just(Move::Scissors), Just(Move::Paper)]
}

fn arb_state() -> impl Strategy<Value = ScreenState> {
    prop_oneof![
        Just(ScreenState::Idle),
        Just(ScreenState::MainMenu),
        Just(ScreenState::MovePicker),
        Just(ScreenState::Result),
    ]
}

fn arb_stats_error() -> impl Strategy<Value = StatsError> {
    prop_oneof![
        any::<i64>().prop_map(StatsError::UserNotFound),
        "[a-z ]{1,20}".prop_map(StatsError::PersistenceFailure),
    ]
}

fn arb_user_stats() -> impl Strategy<Value = UserStats> {
    (any::<i64>(), 0u32..1000, 0u32..1000, 0u32..1000).prop_map(
        |(user_id, wins, defeats, draws)| UserStats {
            user_id,
            wins,
            defeats,
            draws,
        },
    )
}

fn arb_inbound_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        Just(Event::Play),
        Just(Event::ShowStats),
        arb_move().prop_map(Event::MoveChosen),
        "[a-z/]{0,12}".prop_map(Event::UnknownCommand),
        "[a-z]{0,12}".prop_map(Event::UnknownAction),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_inbound_event(),
        Just(Event::UserReady),
        arb_stats_error().prop_map(Event::UserSetupFailed),
        (arb_move(), arb_move()).prop_map(|(a, b)| Event::RoundPlayed(Round::play(a, b))),
        arb_stats_error().prop_map(Event::RoundFailed),
        arb_user_stats().prop_map(Event::StatsLoaded),
        arb_stats_error().prop_map(Event::StatsUnavailable),
    ]
}

fn live_screens(effects: &[Effect]) -> Vec<&Screen> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::ShowScreen(s) if s.retention() == Retention::Live => Some(s),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_unknown_input_never_advances(
        state in arb_state(),
        text in "[a-z/]{0,12}",
    ) {
        for event in [Event::UnknownCommand(text.clone()), Event::UnknownAction(text.clone())] {
            let result = transition(state, event).unwrap();
            prop_assert_eq!(result.new_state, state);
            prop_assert_eq!(result.effects.len(), 1);
            let is_notice = matches!(
                &result.effects[0],
                Effect::ShowScreen(s) if s.retention() == Retention::Notice
            );
            prop_assert!(is_notice);
        }
    }

    #[test]
    fn prop_start_is_always_accepted(state in arb_state()) {
        let result = transition(state, Event::Start).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.effects, vec![Effect::EnsureUser]);
    }

    #[test]
    fn prop_at_most_one_live_screen_and_it_comes_last(
        state in arb_state(),
        event in arb_event(),
    ) {
        if let Ok(result) = transition(state, event) {
            let live = live_screens(&result.effects);
            prop_assert!(live.len() <= 1);
            if let Some(screen) = live.first() {
                let last = result.effects.last().unwrap();
                prop_assert_eq!(last, &Effect::ShowScreen((*screen).clone()));
            }
        }
    }

    #[test]
    fn prop_live_screen_matches_new_state(
        state in arb_state(),
        event in arb_event(),
    ) {
        if let Ok(result) = transition(state, event) {
            for screen in live_screens(&result.effects) {
                let expected = match screen {
                    Screen::MovePicker => ScreenState::MovePicker,
                    _ => ScreenState::MainMenu,
                };
                prop_assert_eq!(result.new_state, expected);
            }
        }
    }

    #[test]
    fn prop_round_only_played_from_picker(
        state in arb_state(),
        event in arb_inbound_event(),
    ) {
        if let Ok(result) = transition(state, event) {
            let plays = result
                .effects
                .iter()
                .any(|e| matches!(e, Effect::PlayRound { .. }));
            if plays {
                prop_assert_eq!(state, ScreenState::MovePicker);
                prop_assert_eq!(result.new_state, ScreenState::Result);
            }
        }
    }

    #[test]
    fn prop_rejection_is_deterministic(
        state in arb_state(),
        event in arb_event(),
    ) {
        let first = transition(state, event.clone());
        let second = transition(state, event);
        prop_assert_eq!(first, second);
    }
}
