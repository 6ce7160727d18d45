//! Bot API HTTP client

use super::types::{
    AnswerCallbackQueryRequest, ApiResponse, DeleteMessageRequest, GetUpdatesRequest,
    SendMessageRequest, SentMessage, Update, User,
};
use super::TransportError;
use crate::config::BotConfig;
use crate::runtime::{ChatId, MessageId, Transport};
use crate::screen::ScreenView;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Slack on top of the long-poll timeout before the HTTP request gives up
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    /// `{api_url}/bot{token}`; never logged
    base_url: String,
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.poll_timeout_secs)) + REQUEST_TIMEOUT_MARGIN)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.bot_token
            ),
        })
    }

    /// Identity of the bot; doubles as a token check at startup
    pub async fn get_me(&self) -> Result<User, TransportError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64, timeout: u32) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &request).await
    }

    /// Stop the client's loading spinner on a pressed button
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQueryRequest { callback_query_id },
            )
            .await?;
        Ok(())
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TransportError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .json(params)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the token
                let e = e.without_url();
                if e.is_timeout() {
                    TransportError::network(format!("{method}: request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::network(format!("{method}: connection failed: {e}"))
                } else {
                    TransportError::network(format!("{method}: request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            TransportError::network(format!("{method}: failed to read response: {}", e.without_url()))
        })?;

        let envelope: ApiResponse<R> = serde_json::from_str(&body).map_err(|e| {
            TransportError::decode(format!("{method}: HTTP {status}, unparseable body: {e}"))
        })?;

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            envelope => Err(classify_error(method, status.as_u16(), envelope)),
        }
    }
}

fn classify_error<R>(method: &str, status: u16, envelope: ApiResponse<R>) -> TransportError {
    let code = envelope.error_code.unwrap_or_else(|| i64::from(status));
    let description = envelope
        .description
        .unwrap_or_else(|| "no description".to_string());
    let message = format!("{method}: {description}");

    if code == 429 {
        let err = TransportError::rate_limit(message);
        match envelope.parameters.and_then(|p| p.retry_after) {
            Some(secs) => err.with_retry_after(Duration::from_secs(secs)),
            None => err,
        }
    } else {
        TransportError::api(code, message)
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_screen(
        &self,
        chat_id: ChatId,
        view: &ScreenView,
    ) -> Result<MessageId, TransportError> {
        let sent: SentMessage = self
            .call("sendMessage", &SendMessageRequest::from_view(chat_id, view))
            .await?;
        Ok(sent.message_id)
    }

    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "deleteMessage",
                &DeleteMessageRequest {
                    chat_id,
                    message_id,
                },
            )
            .await?;
        Ok(())
    }
}
