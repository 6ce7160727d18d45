//! Rock-paper-scissors Telegram bot
//!
//! Plays single rounds against a random opponent and keeps per-user
//! win/loss/draw counters in SQLite.

mod config;
mod db;
mod game;
mod runtime;
mod screen;
mod state_machine;
mod stats;
mod telegram;

use config::BotConfig;
use db::Database;
use game::RandomOpponent;
use runtime::{DatabaseStore, ProductionRuntime};
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rps_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = BotConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;
    tracing::info!(users = db.user_count()?, "Database ready");

    // Initialize Telegram client
    let client = Arc::new(TelegramClient::new(&config)?);
    let me = client.get_me().await?;
    tracing::info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or(&me.first_name),
        "Authorized with Telegram"
    );

    let manager: ProductionRuntime = ProductionRuntime::new(
        DatabaseStore::new(db),
        client.clone(),
        Arc::new(RandomOpponent),
    )
    .with_idle_timeout(Duration::from_secs(config.chat_idle_secs));

    tokio::select! {
        result = telegram::run_polling(&client, &manager, config.poll_timeout_secs) => result?,
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!(active_chats = manager.active_chats().await, "Shutting down");
        }
    }

    Ok(())
}
