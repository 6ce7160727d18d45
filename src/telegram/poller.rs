//! Long-polling update loop

use super::{Inbound, TelegramClient, TransportError};
use crate::runtime::{RuntimeManager, StatsStore, Transport};
use crate::state_machine::Event;
use std::time::Duration;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Poll for updates, handing each one to its chat's runtime.
///
/// Retryable errors are logged and retried with exponential back-off. Any
/// other error (revoked token, a second poller on the same token, an
/// unreadable response) ends polling and is returned.
pub async fn run_polling<S, T>(
    client: &TelegramClient,
    manager: &RuntimeManager<S, T>,
    poll_timeout_secs: u32,
) -> Result<(), TransportError>
where
    S: StatsStore + Clone + 'static,
    T: Transport + 'static,
{
    let mut offset = 0;
    let mut backoff = INITIAL_BACKOFF;

    tracing::info!(timeout_secs = poll_timeout_secs, "Polling for updates");

    loop {
        let updates = match client.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                updates
            }
            Err(e) => {
                let Some(delay) = retry_delay(&e, backoff) else {
                    tracing::error!(error = %e, kind = ?e.kind, "Polling failed permanently");
                    return Err(e);
                };
                tracing::warn!(
                    error = %e,
                    retry_in_ms = %delay.as_millis(),
                    "Failed to fetch updates"
                );
                tokio::time::sleep(delay).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }
        };

        for update in updates {
            // Acknowledge before handling so a poisoned update is not redelivered
            offset = offset.max(update.update_id + 1);
            if let Some(inbound) = update.into_inbound() {
                handle_inbound(client, manager, inbound).await;
            }
        }
    }
}

async fn handle_inbound<S, T>(client: &TelegramClient, manager: &RuntimeManager<S, T>, inbound: Inbound)
where
    S: StatsStore + Clone + 'static,
    T: Transport + 'static,
{
    let Inbound {
        chat_id,
        event,
        callback_query_id,
        username,
    } = inbound;

    if let Some(id) = callback_query_id {
        if let Err(e) = client.answer_callback_query(&id).await {
            tracing::debug!(chat_id, error = %e, "Failed to answer callback query");
        }
    }

    if let Event::UnknownCommand(text) = &event {
        tracing::info!(
            chat_id,
            username = username.as_deref().unwrap_or("-"),
            text = %text,
            "Unrecognized message"
        );
    }

    manager.dispatch(chat_id, event).await;
}

/// Delay before the next attempt, or `None` when retrying cannot help.
/// Honors the server's advertised delay when there is one.
fn retry_delay(err: &TransportError, backoff: Duration) -> Option<Duration> {
    err.kind
        .is_retryable()
        .then(|| err.retry_after.unwrap_or(backoff))
}
