//! Telegram Bot API transport
//!
//! Long polling for inbound updates, plain HTTPS calls for outbound screens.

mod client;
mod error;
mod poller;
mod types;

pub use client::TelegramClient;
pub use error::{TransportError, TransportErrorKind};
pub use poller::run_polling;
pub use types::Inbound;
