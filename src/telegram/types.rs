//! Bot API wire types
//!
//! Only the fields the bot reads or writes are modelled; serde ignores the rest.

use crate::runtime::{ChatId, MessageId};
use crate::screen::ScreenView;
use crate::state_machine::Event;
use serde::{Deserialize, Serialize};

// ============================================================================
// Responses
// ============================================================================

/// Envelope around every Bot API response
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ResponseParameters {
    pub retry_after: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
pub(super) struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u32,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub(super) struct SendMessageRequest<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

impl<'a> SendMessageRequest<'a> {
    pub fn from_view(chat_id: ChatId, view: &'a ScreenView) -> Self {
        let reply_markup = (!view.keyboard.is_empty()).then(|| InlineKeyboardMarkup {
            inline_keyboard: view
                .keyboard
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| InlineKeyboardButton {
                            text: &b.label,
                            callback_data: &b.data,
                        })
                        .collect()
                })
                .collect(),
        });

        Self {
            chat_id,
            text: &view.text,
            reply_markup,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct InlineKeyboardMarkup<'a> {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton<'a>>>,
}

#[derive(Debug, Serialize)]
pub(super) struct InlineKeyboardButton<'a> {
    pub text: &'a str,
    pub callback_data: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteMessageRequest {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

#[derive(Debug, Serialize)]
pub(super) struct AnswerCallbackQueryRequest<'a> {
    pub callback_query_id: &'a str,
}

/// Returned by `sendMessage`
#[derive(Debug, Deserialize)]
pub(super) struct SentMessage {
    pub message_id: MessageId,
}

// ============================================================================
// Classification
// ============================================================================

/// An update reduced to what the session runtime needs
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub chat_id: ChatId,
    pub event: Event,
    /// Set for button presses; the query must be answered
    pub callback_query_id: Option<String>,
    pub username: Option<String>,
}

impl Update {
    /// Classify the update. Returns `None` for kinds the bot ignores
    /// (edited messages, channel posts, inline-mode callbacks).
    pub fn into_inbound(self) -> Option<Inbound> {
        if let Some(query) = self.callback_query {
            let message = query.message?;
            return Some(Inbound {
                chat_id: message.chat.id,
                event: Event::from_callback_data(query.data.as_deref().unwrap_or_default()),
                callback_query_id: Some(query.id),
                username: query.from.username,
            });
        }

        let message = self.message?;
        Some(Inbound {
            chat_id: message.chat.id,
            event: Event::from_message_text(message.text.as_deref().unwrap_or_default()),
            callback_query_id: None,
            username: message.from.and_then(|u| u.username),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Move;
    use crate::screen::Screen;
    use serde_json::json;

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_start_command() {
        let inbound = update(json!({
            "update_id": 10,
            "message": {
                "message_id": 5,
                "date": 1_700_000_000,
                "chat": { "id": 42, "type": "private" },
                "from": { "id": 42, "is_bot": false, "first_name": "Ann", "username": "ann" },
                "text": "/start",
                "entities": [{ "type": "bot_command", "offset": 0, "length": 6 }]
            }
        }))
        .into_inbound()
        .unwrap();

        assert_eq!(inbound.chat_id, 42);
        assert_eq!(inbound.event, Event::Start);
        assert_eq!(inbound.callback_query_id, None);
        assert_eq!(inbound.username.as_deref(), Some("ann"));
    }

    #[test]
    fn test_button_press() {
        let inbound = update(json!({
            "update_id": 11,
            "callback_query": {
                "id": "cbq-1",
                "from": { "id": 42, "is_bot": false, "first_name": "Ann" },
                "message": { "message_id": 6, "chat": { "id": 42 } },
                "chat_instance": "abc",
                "data": "paper"
            }
        }))
        .into_inbound()
        .unwrap();

        assert_eq!(inbound.event, Event::MoveChosen(Move::Paper));
        assert_eq!(inbound.callback_query_id.as_deref(), Some("cbq-1"));
    }

    #[test]
    fn test_message_without_text_is_unknown_command() {
        let inbound = update(json!({
            "update_id": 12,
            "message": { "message_id": 7, "chat": { "id": 1 }, "sticker": {} }
        }))
        .into_inbound()
        .unwrap();

        assert_eq!(inbound.event, Event::UnknownCommand(String::new()));
    }

    #[test]
    fn test_ignored_updates() {
        assert!(update(json!({ "update_id": 13, "edited_message": {} }))
            .into_inbound()
            .is_none());
        assert!(update(json!({
            "update_id": 14,
            "callback_query": {
                "id": "inline",
                "from": { "id": 1, "first_name": "A" },
                "inline_message_id": "xyz",
                "data": "play"
            }
        }))
        .into_inbound()
        .is_none());
    }

    #[test]
    fn test_send_request_keyboard() {
        let view = Screen::MovePicker.render();
        let body = serde_json::to_value(SendMessageRequest::from_view(9, &view)).unwrap();

        assert_eq!(body["chat_id"], 9);
        assert_eq!(body["text"], "Choose your move:");
        let row = &body["reply_markup"]["inline_keyboard"][0];
        assert_eq!(row.as_array().unwrap().len(), 3);
        assert_eq!(row[0]["callback_data"], "rock");
    }

    #[test]
    fn test_send_request_without_keyboard() {
        let view = Screen::Notice(crate::screen::NoticeKind::UnknownCommand).render();
        let body = serde_json::to_value(SendMessageRequest::from_view(9, &view)).unwrap();
        assert!(body.get("reply_markup").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let resp: ApiResponse<SentMessage> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 3",
            "parameters": { "retry_after": 3 }
        }))
        .unwrap();

        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.error_code, Some(429));
        assert_eq!(resp.parameters.and_then(|p| p.retry_after), Some(3));
        assert!(resp.description.unwrap().starts_with("Too Many"));
    }
}
