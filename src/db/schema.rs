//! Database schema and types

use crate::stats::UserStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER UNIQUE NOT NULL,
    number_of_wins INTEGER NOT NULL DEFAULT 0,
    number_of_defeats INTEGER NOT NULL DEFAULT 0,
    number_of_draws INTEGER NOT NULL DEFAULT 0,
    created_at TEXT,
    updated_at TEXT
);
";

/// Row of the `users` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub stats: UserStats,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub(super) fn parse_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
