//! Per-chat runtime executor

use super::traits::{ChatId, MessageId, StatsStore, Transport};

use crate::game::{Opponent, Round};
use crate::screen::{NoticeKind, Retention, Screen};
use crate::state_machine::{transition, Effect, Event, ScreenState};
use crate::stats::{StatsAccumulator, StatsError};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Owns one chat's screen state and live message
pub struct ChatRuntime<S, T>
where
    S: StatsStore + Clone + 'static,
    T: Transport + 'static,
{
    chat_id: ChatId,
    state: ScreenState,
    /// The message to delete before the next Live or Transcript screen
    live_screen: Option<MessageId>,
    stats: StatsAccumulator<S>,
    transport: Arc<T>,
    opponent: Arc<dyn Opponent>,
}

impl<S, T> ChatRuntime<S, T>
where
    S: StatsStore + Clone + 'static,
    T: Transport + 'static,
{
    pub fn new(chat_id: ChatId, store: S, transport: Arc<T>, opponent: Arc<dyn Opponent>) -> Self {
        Self {
            chat_id,
            state: ScreenState::Idle,
            live_screen: None,
            stats: StatsAccumulator::new(store),
            transport,
            opponent,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn state(&self) -> ScreenState {
        self.state
    }

    #[allow(dead_code)] // Used in tests
    pub fn live_screen(&self) -> Option<MessageId> {
        self.live_screen
    }

    /// Process events until the channel closes or nothing arrives for
    /// `idle_timeout`. Screen state is dropped on exit.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<Event>, idle_timeout: Duration) {
        tracing::info!(chat_id = self.chat_id, "Starting chat runtime");

        loop {
            match tokio::time::timeout(idle_timeout, event_rx.recv()).await {
                Ok(Some(event)) => self.process_event(event).await,
                Ok(None) => break,
                Err(_) => {
                    // Refuse new events, then finish whatever was already queued
                    event_rx.close();
                    while let Some(event) = event_rx.recv().await {
                        self.process_event(event).await;
                    }
                    tracing::debug!(
                        chat_id = self.chat_id,
                        idle_secs = idle_timeout.as_secs(),
                        "Chat runtime idle"
                    );
                    break;
                }
            }
        }

        tracing::info!(chat_id = self.chat_id, "Chat runtime stopped");
    }

    /// Run one inbound event and every event its effects generate
    pub async fn process_event(&mut self, event: Event) {
        let mut events = VecDeque::from([event]);

        while let Some(current) = events.pop_front() {
            let name = current.name();
            let inbound = current.is_inbound();
            let result = match transition(self.state, current) {
                Ok(r) => r,
                Err(e) if inbound => {
                    // Typically a stale button from an earlier session
                    tracing::warn!(chat_id = self.chat_id, error = %e, "Rejected event");
                    self.show_screen(Screen::Notice(NoticeKind::TryAgain)).await;
                    continue;
                }
                Err(e) => {
                    tracing::error!(chat_id = self.chat_id, error = %e, "Dropped effect result");
                    continue;
                }
            };

            if result.new_state != self.state {
                tracing::debug!(
                    chat_id = self.chat_id,
                    event = name,
                    from = ?self.state,
                    to = ?result.new_state,
                    "State transition"
                );
            }
            self.state = result.new_state;

            for effect in result.effects {
                if let Some(generated) = self.execute_effect(effect).await {
                    events.push_back(generated);
                }
            }
        }
    }

    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::EnsureUser => Some(match self.stats.ensure_user(self.chat_id).await {
                Ok(_) => Event::UserReady,
                Err(e) => {
                    tracing::error!(chat_id = self.chat_id, error = %e, "Failed to register user");
                    Event::UserSetupFailed(e)
                }
            }),

            Effect::PlayRound { player_move } => {
                let round = Round::play(player_move, self.opponent.next_move());
                Some(match self.stats.apply_outcome(self.chat_id, round.outcome).await {
                    Ok(stats) => {
                        tracing::info!(
                            chat_id = self.chat_id,
                            player_move = player_move.as_str(),
                            bot_move = round.bot_move.as_str(),
                            outcome = ?round.outcome,
                            rounds = stats.total(),
                            "Round played"
                        );
                        Event::RoundPlayed(round)
                    }
                    Err(e) => {
                        log_stats_error(self.chat_id, &e, "Round not recorded");
                        Event::RoundFailed(e)
                    }
                })
            }

            Effect::LoadStats => Some(match self.stats.stats(self.chat_id).await {
                Ok(stats) => Event::StatsLoaded(stats),
                Err(e) => {
                    log_stats_error(self.chat_id, &e, "Stats unavailable");
                    Event::StatsUnavailable(e)
                }
            }),

            Effect::ShowScreen(screen) => {
                self.show_screen(screen).await;
                None
            }
        }
    }

    /// Send a screen, keeping at most one live message in the chat
    async fn show_screen(&mut self, screen: Screen) {
        let retention = screen.retention();
        if retention != Retention::Notice {
            self.retire_live_screen().await;
        }

        let view = screen.render();
        match self.transport.send_screen(self.chat_id, &view).await {
            Ok(message_id) => {
                tracing::debug!(
                    chat_id = self.chat_id,
                    message_id,
                    screen = screen.name(),
                    "Screen sent"
                );
                if retention == Retention::Live {
                    self.live_screen = Some(message_id);
                }
            }
            Err(e) => {
                // Nothing is tracked, so no stale delete follows
                tracing::warn!(
                    chat_id = self.chat_id,
                    screen = screen.name(),
                    error = %e,
                    "Failed to send screen"
                );
            }
        }
    }

    /// Best-effort delete of the live message; tracking is cleared either way
    async fn retire_live_screen(&mut self) {
        let Some(message_id) = self.live_screen.take() else {
            return;
        };

        if let Err(e) = self.transport.delete_message(self.chat_id, message_id).await {
            tracing::warn!(
                chat_id = self.chat_id,
                message_id,
                error = %e,
                "Failed to delete previous screen"
            );
        }
    }
}

fn log_stats_error(chat_id: ChatId, err: &StatsError, message: &str) {
    match err {
        StatsError::UserNotFound(_) => tracing::warn!(chat_id, error = %err, "{message}"),
        StatsError::PersistenceFailure(_) => tracing::error!(chat_id, error = %err, "{message}"),
    }
}
