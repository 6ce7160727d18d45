//! Runtime for executing chat sessions
//!
//! Each chat gets its own task and event channel, so screen state and the
//! live message id are never shared between chats.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use traits::*;

use crate::game::Opponent;
use crate::state_machine::Event;
use crate::telegram::TelegramClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime = RuntimeManager<DatabaseStore, TelegramClient>;

/// Events buffered per chat; further events for that chat are dropped
const CHAT_QUEUE_DEPTH: usize = 32;

/// How long a chat runtime waits for an event before shutting down
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

type RuntimeMap = Arc<RwLock<HashMap<ChatId, mpsc::Sender<Event>>>>;

/// Manager for all chat runtimes
pub struct RuntimeManager<S, T>
where
    S: StatsStore + Clone + 'static,
    T: Transport + 'static,
{
    store: S,
    transport: Arc<T>,
    opponent: Arc<dyn Opponent>,
    idle_timeout: Duration,
    runtimes: RuntimeMap,
}

impl<S, T> RuntimeManager<S, T>
where
    S: StatsStore + Clone + 'static,
    T: Transport + 'static,
{
    pub fn new(store: S, transport: Arc<T>, opponent: Arc<dyn Opponent>) -> Self {
        Self {
            store,
            transport,
            opponent,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Number of chats with a running runtime
    pub async fn active_chats(&self) -> usize {
        self.runtimes.read().await.len()
    }

    /// Route an event to its chat's runtime, starting one if needed.
    ///
    /// Never waits on the chat: a full queue drops the event so one stuck
    /// chat cannot hold up the rest.
    pub async fn dispatch(&self, chat_id: ChatId, event: Event) {
        let tx = self.get_or_create(chat_id).await;
        let event = match tx.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(chat_id, event = event.name(), "Chat queue full, dropping event");
                return;
            }
            Err(TrySendError::Closed(event)) => event,
        };

        // The task has stopped (idle or crashed); start a fresh one and retry once
        tracing::debug!(chat_id, "Chat runtime stopped, restarting");
        {
            let mut runtimes = self.runtimes.write().await;
            if runtimes.get(&chat_id).is_some_and(mpsc::Sender::is_closed) {
                runtimes.remove(&chat_id);
            }
        }
        let tx = self.get_or_create(chat_id).await;
        if let Err(e) = tx.try_send(event) {
            tracing::error!(chat_id, error = %e, "Dropping event, chat runtime unavailable");
        }
    }

    /// Get or create the event channel for a chat
    async fn get_or_create(&self, chat_id: ChatId) -> mpsc::Sender<Event> {
        // Check if already running
        if let Some(tx) = self.runtimes.read().await.get(&chat_id) {
            return tx.clone();
        }

        let mut runtimes = self.runtimes.write().await;
        // Another dispatch may have won the race for the write lock
        if let Some(tx) = runtimes.get(&chat_id) {
            return tx.clone();
        }

        let (event_tx, event_rx) = mpsc::channel(CHAT_QUEUE_DEPTH);
        let runtime = ChatRuntime::new(
            chat_id,
            self.store.clone(),
            self.transport.clone(),
            self.opponent.clone(),
        );
        let idle_timeout = self.idle_timeout;
        let registry = Arc::clone(&self.runtimes);
        tokio::spawn(async move {
            runtime.run(event_rx, idle_timeout).await;
            // A replacement may already be registered; only drop our own dead entry
            let mut runtimes = registry.write().await;
            if runtimes.get(&chat_id).is_some_and(mpsc::Sender::is_closed) {
                runtimes.remove(&chat_id);
            }
        });

        runtimes.insert(chat_id, event_tx.clone());
        event_tx
    }
}
