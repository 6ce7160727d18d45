//! Database module for the bot
//!
//! Provides persistence for per-user round counters.

mod schema;

pub use schema::*;

use crate::runtime::ChatId;
use crate::stats::UserStats;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("User not found: {0}")]
    UserNotFound(ChatId),
    #[error("User already exists: {0}")]
    UserExists(ChatId),
    #[error("Database connection lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Poisoned)
    }

    fn init_schema(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== User Operations ====================

    /// Insert a user with zeroed counters
    pub fn create_user(&self, user_id: ChatId) -> DbResult<UserRecord> {
        let conn = self.conn()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (user_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
            params![user_id, now.to_rfc3339()],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                DbError::UserExists(user_id)
            }
            other => DbError::Sqlite(other),
        })?;

        Ok(UserRecord {
            stats: UserStats::new(user_id),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    /// Get a user by chat id
    pub fn get_user(&self, user_id: ChatId) -> DbResult<UserRecord> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT user_id, number_of_wins, number_of_defeats, number_of_draws,
                    created_at, updated_at
             FROM users WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserRecord {
                    stats: UserStats {
                        user_id: row.get(0)?,
                        wins: row.get(1)?,
                        defeats: row.get(2)?,
                        draws: row.get(3)?,
                    },
                    created_at: parse_datetime(row.get(4)?),
                    updated_at: parse_datetime(row.get(5)?),
                })
            },
        )
        .optional()?
        .ok_or(DbError::UserNotFound(user_id))
    }

    /// Overwrite all three counters in one statement
    pub fn update_user_stats(&self, user_id: ChatId, stats: &UserStats) -> DbResult<()> {
        let conn = self.conn()?;
        let now = Utc::now();

        let updated = conn.execute(
            "UPDATE users
             SET number_of_wins = ?1, number_of_defeats = ?2, number_of_draws = ?3, updated_at = ?4
             WHERE user_id = ?5",
            params![stats.wins, stats.defeats, stats.draws, now.to_rfc3339(), user_id],
        )?;

        if updated == 0 {
            return Err(DbError::UserNotFound(user_id));
        }
        Ok(())
    }

    /// Number of registered users
    pub fn user_count(&self) -> DbResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}
