//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the chat runtime with mock implementations.

use crate::db::{Database, DbError};
use crate::screen::ScreenView;
use crate::stats::UserStats;
use crate::telegram::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Telegram chat id; for private chats this is also the user id
pub type ChatId = i64;

pub type MessageId = i64;

/// Storage failures as seen by the core
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("User not found")]
    NotFound,
    #[error("User already exists")]
    AlreadyExists,
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Storage for per-user counters
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn get_user(&self, user_id: ChatId) -> Result<UserStats, StoreError>;

    /// Insert a user with zeroed counters
    async fn create_user(&self, user_id: ChatId) -> Result<(), StoreError>;

    /// Overwrite all three counters at once
    async fn update_stats(&self, user_id: ChatId, stats: &UserStats) -> Result<(), StoreError>;
}

/// Outbound side of the chat transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a screen, returning the id of the new message
    async fn send_screen(&self, chat_id: ChatId, view: &ScreenView)
        -> Result<MessageId, TransportError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId)
        -> Result<(), TransportError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: StatsStore + ?Sized> StatsStore for Arc<T> {
    async fn get_user(&self, user_id: ChatId) -> Result<UserStats, StoreError> {
        (**self).get_user(user_id).await
    }

    async fn create_user(&self, user_id: ChatId) -> Result<(), StoreError> {
        (**self).create_user(user_id).await
    }

    async fn update_stats(&self, user_id: ChatId, stats: &UserStats) -> Result<(), StoreError> {
        (**self).update_stats(user_id, stats).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_screen(
        &self,
        chat_id: ChatId,
        view: &ScreenView,
    ) -> Result<MessageId, TransportError> {
        (**self).send_screen(chat_id, view).await
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        (**self).delete_message(chat_id, message_id).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UserNotFound(_) => StoreError::NotFound,
            DbError::UserExists(_) => StoreError::AlreadyExists,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Adapter to use Database as a `StatsStore`
#[derive(Clone)]
pub struct DatabaseStore {
    db: Database,
}

impl DatabaseStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsStore for DatabaseStore {
    async fn get_user(&self, user_id: ChatId) -> Result<UserStats, StoreError> {
        Ok(self.db.get_user(user_id)?.stats)
    }

    async fn create_user(&self, user_id: ChatId) -> Result<(), StoreError> {
        self.db.create_user(user_id)?;
        Ok(())
    }

    async fn update_stats(&self, user_id: ChatId, stats: &UserStats) -> Result<(), StoreError> {
        Ok(self.db.update_user_stats(user_id, stats)?)
    }
}
