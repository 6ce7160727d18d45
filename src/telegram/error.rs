//! Transport error types

use std::time::Duration;
use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    pub retry_after: Option<Duration>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn with_retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::RateLimit, message)
    }

    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Api { code }, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Decode, message)
    }
}

/// Error classification for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection failures and timeouts - retryable
    Network,
    /// Too many requests (429) - retryable after the advertised delay
    RateLimit,
    /// Bot API rejected the call
    Api { code: i64 },
    /// Response body did not match the Bot API envelope
    Decode,
}

impl TransportErrorKind {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::RateLimit => true,
            Self::Api { code } => *code >= 500,
            Self::Decode => false,
        }
    }
}
