//! Per-user win/loss/draw counters
//!
//! The store row is the only state; nothing is cached between calls.

use crate::game::Outcome;
use crate::runtime::{ChatId, StatsStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cumulative counters for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub user_id: ChatId,
    pub wins: u32,
    pub defeats: u32,
    pub draws: u32,
}

impl UserStats {
    pub fn new(user_id: ChatId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Number of completed rounds
    pub fn total(&self) -> u32 {
        self.wins + self.defeats + self.draws
    }

    /// Share of rounds won; 0.0 before the first round
    pub fn win_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.wins) / f64::from(total),
        }
    }

    /// Count one outcome
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Draw => self.draws += 1,
            Outcome::PlayerWin => self.wins += 1,
            Outcome::BotWin => self.defeats += 1,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("User not found: {0}")]
    UserNotFound(ChatId),
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
}

impl StatsError {
    fn from_store(user_id: ChatId, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => StatsError::UserNotFound(user_id),
            other => StatsError::PersistenceFailure(other.to_string()),
        }
    }
}

/// Applies round outcomes to stored counters
#[derive(Clone)]
pub struct StatsAccumulator<S> {
    store: S,
}

impl<S: StatsStore> StatsAccumulator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[allow(dead_code)] // Used in tests
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the user with zeroed counters unless it already exists
    pub async fn ensure_user(&self, user_id: ChatId) -> Result<UserStats, StatsError> {
        match self.store.get_user(user_id).await {
            Ok(stats) => return Ok(stats),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(StatsError::from_store(user_id, e)),
        }

        match self.store.create_user(user_id).await {
            Ok(()) => {
                tracing::info!(user_id, "Registered new user");
                Ok(UserStats::new(user_id))
            }
            // Lost a race with another create; the row is there now
            Err(StoreError::AlreadyExists) => self.stats(user_id).await,
            Err(e) => Err(StatsError::from_store(user_id, e)),
        }
    }

    /// Current counters. Read-only.
    pub async fn stats(&self, user_id: ChatId) -> Result<UserStats, StatsError> {
        self.store
            .get_user(user_id)
            .await
            .map_err(|e| StatsError::from_store(user_id, e))
    }

    /// Count one completed round and persist the full triple in one write.
    ///
    /// The user must already exist; a missing user fails with
    /// `UserNotFound` without writing anything.
    pub async fn apply_outcome(
        &self,
        user_id: ChatId,
        outcome: Outcome,
    ) -> Result<UserStats, StatsError> {
        let mut stats = self.stats(user_id).await?;
        stats.record(outcome);

        self.store
            .update_stats(user_id, &stats)
            .await
            .map_err(|e| StatsError::from_store(user_id, e))?;

        tracing::debug!(
            user_id,
            wins = stats.wins,
            defeats = stats.defeats,
            draws = stats.draws,
            "Recorded round outcome"
        );
        Ok(stats)
    }
}
