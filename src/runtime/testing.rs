//! Mock implementations for testing
//!
//! These mocks enable runtime tests without a database or network.

use super::traits::{ChatId, MessageId, StatsStore, StoreError, Transport};
use crate::game::{Move, Opponent};
use crate::screen::ScreenView;
use crate::stats::UserStats;
use crate::telegram::TransportError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory store that counts writes and can be told to fail
#[allow(dead_code)]
pub struct InMemoryStore {
    users: Mutex<HashMap<ChatId, UserStats>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

#[allow(dead_code)]
impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Number of successful creates and updates
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, user_id: ChatId) -> bool {
        self.users.lock().unwrap().contains_key(&user_id)
    }

    pub fn snapshot(&self, user_id: ChatId) -> Option<UserStats> {
        self.users.lock().unwrap().get(&user_id).copied()
    }

    /// Drop a user behind the runtime's back
    pub fn remove(&self, user_id: ChatId) {
        self.users.lock().unwrap().remove(&user_id);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn get_user(&self, user_id: ChatId) -> Result<UserStats, StoreError> {
        self.snapshot(user_id).ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, user_id: ChatId) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user_id) {
            return Err(StoreError::AlreadyExists);
        }
        users.insert(user_id, UserStats::new(user_id));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_stats(&self, user_id: ChatId, stats: &UserStats) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut users = self.users.lock().unwrap();
        let row = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        *row = *stats;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Recording Transport
// ============================================================================

/// A call made against the transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCall {
    Send {
        chat_id: ChatId,
        message_id: MessageId,
        view: ScreenView,
    },
    Delete {
        chat_id: ChatId,
        message_id: MessageId,
    },
}

/// Transport that records every call and hands out sequential message ids
#[allow(dead_code)]
pub struct RecordingTransport {
    calls: Mutex<Vec<TransportCall>>,
    next_message_id: AtomicI64,
    fail_sends: AtomicBool,
    fail_deletes: AtomicBool,
    /// Sends to this chat never complete
    stalled_chat: Mutex<Option<ChatId>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_message_id: AtomicI64::new(1),
            fail_sends: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            stalled_chat: Mutex::new(None),
        }
    }

    /// Make every send to `chat_id` hang, like a request that never returns
    pub fn stall_chat(&self, chat_id: ChatId) {
        *self.stalled_chat.lock().unwrap() = Some(chat_id);
    }

    /// Texts of screens successfully sent to one chat
    pub fn sent_texts_for(&self, chat: ChatId) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Send { chat_id, view, .. } if chat_id == chat => Some(view.text),
                _ => None,
            })
            .collect()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of successfully sent screens, oldest first
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Send { view, .. } => Some(view.text),
                TransportCall::Delete { .. } => None,
            })
            .collect()
    }

    pub fn last_message_id(&self) -> Option<MessageId> {
        self.calls().into_iter().rev().find_map(|c| match c {
            TransportCall::Send { message_id, .. } => Some(message_id),
            TransportCall::Delete { .. } => None,
        })
    }

    /// Ids passed to delete, including failed attempts
    pub fn deleted_ids(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Delete { message_id, .. } => Some(message_id),
                TransportCall::Send { .. } => None,
            })
            .collect()
    }

    pub fn delete_count(&self) -> usize {
        self.deleted_ids().len()
    }

    pub fn deletes_for(&self, chat: ChatId) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                TransportCall::Delete {
                    chat_id,
                    message_id,
                } if chat_id == chat => Some(message_id),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_screen(
        &self,
        chat_id: ChatId,
        view: &ScreenView,
    ) -> Result<MessageId, TransportError> {
        let stalled = *self.stalled_chat.lock().unwrap() == Some(chat_id);
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::network("injected send failure"));
        }
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(TransportCall::Send {
            chat_id,
            message_id,
            view: view.clone(),
        });
        Ok(message_id)
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(TransportCall::Delete {
            chat_id,
            message_id,
        });
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(TransportError::api(400, "message to delete not found"));
        }
        Ok(())
    }
}

// ============================================================================
// Scripted Opponent
// ============================================================================

/// Opponent that plays queued moves, then rock forever
pub struct ScriptedOpponent {
    moves: Mutex<VecDeque<Move>>,
}

impl ScriptedOpponent {
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: Mutex::new(moves.into_iter().collect()),
        }
    }
}

impl Opponent for ScriptedOpponent {
    fn next_move(&self) -> Move {
        self.moves.lock().unwrap().pop_front().unwrap_or(Move::Rock)
    }
}
