//! Process configuration from the environment

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const DEFAULT_POLL_TIMEOUT_SECS: u32 = 60;
const DEFAULT_CHAT_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration
#[derive(Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub db_path: PathBuf,
    pub api_url: String,
    pub poll_timeout_secs: u32,
    /// Idle seconds before a chat's runtime is shut down
    pub chat_idle_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            db_path: PathBuf::from("rps.db"),
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            chat_idle_secs: DEFAULT_CHAT_IDLE_SECS,
        }
    }
}

// The token grants full control of the bot
impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("chat_idle_secs", &self.chat_idle_secs)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let db_path = lookup("RPS_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.rps-bot/rps.db"))
            },
            PathBuf::from,
        );

        let api_url = lookup("TELEGRAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let poll_timeout_secs =
            parse_var(&lookup, "RPS_POLL_TIMEOUT_SECS")?.unwrap_or(DEFAULT_POLL_TIMEOUT_SECS);
        let chat_idle_secs =
            parse_var(&lookup, "RPS_CHAT_IDLE_SECS")?.unwrap_or(DEFAULT_CHAT_IDLE_SECS);

        Ok(Self {
            bot_token,
            db_path,
            api_url,
            poll_timeout_secs,
            chat_idle_secs,
        })
    }
}

fn parse_var<V: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<V>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}
