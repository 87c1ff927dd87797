//! Shared error type across sidechat crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ChatError>;

/// Unified error type used by core and client.
///
/// Malformed commands are deliberately absent: they never cross a call
/// boundary (the classifier drops them in place, see
/// [`crate::classify::DropReason`]).
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network-level failure (connect, timeout, abort) during poll or send.
    #[error("transport: {0}")]
    Transport(String),
    /// Non-success HTTP status from the chat endpoint.
    #[error("http status {0}")]
    Status(u16),
    /// Response body was not valid JSON or lacked the expected shape.
    #[error("decode: {0}")]
    Decode(String),
    /// Invalid configuration, rejected at construction.
    #[error("config: {0}")]
    Config(String),
}

impl ChatError {
    /// Stable label for counters and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            ChatError::Transport(_) => "transport",
            ChatError::Status(_) => "status",
            ChatError::Decode(_) => "decode",
            ChatError::Config(_) => "config",
        }
    }

    /// Whether the poll loop should back off and try again.
    ///
    /// Decode failures are treated exactly like transport failures: the
    /// response is discarded and the same cursor is retried.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, ChatError::Config(_))
    }
}
