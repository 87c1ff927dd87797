//! Per-message classification.
//!
//! Splits one inbound message into exactly one of: a transcript line, a
//! playback command, or a drop. Classification is pure and infallible — a
//! malformed message becomes a [`DropReason`], never an error, so one bad
//! message can never poison the rest of its batch.

use crate::protocol::command::{CommandError, PlayerCommand};
use crate::protocol::wire::{InboundMessage, MessageKind};

/// Outcome of classifying a single inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// Append `(user, text)` to the transcript.
    Transcript { user: String, text: String },
    /// Hand to the command executor.
    Command(PlayerCommand),
    /// Dispatch nothing.
    Dropped(DropReason),
}

/// Why a message produced no dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// `type` was neither "text" nor "command".
    UnknownKind,
    /// `type` was "command" but no command name was present.
    UnnamedCommand,
    /// Command name unknown or arguments invalid.
    Command(CommandError),
}

impl DropReason {
    /// Stable label for counters and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            DropReason::UnknownKind => "unknown_kind",
            DropReason::UnnamedCommand => "unnamed_command",
            DropReason::Command(CommandError::Unknown(_)) => "unknown_command",
            DropReason::Command(CommandError::BadArgument { .. }) => "bad_argument",
        }
    }
}

/// Classify one message. Text without an author is attributed to
/// `bot_name`; text without a body becomes an empty line; command arguments
/// default to an empty map.
pub fn classify(msg: &InboundMessage, bot_name: &str) -> Classified {
    match msg.kind {
        MessageKind::Text => Classified::Transcript {
            user: msg.user.clone().unwrap_or_else(|| bot_name.to_owned()),
            text: msg.text.clone().unwrap_or_default(),
        },
        MessageKind::Command => {
            let Some(name) = msg.command.as_deref() else {
                return Classified::Dropped(DropReason::UnnamedCommand);
            };
            let parsed = match &msg.args {
                Some(args) => PlayerCommand::parse(name, args),
                None => PlayerCommand::parse(name, &serde_json::Map::new()),
            };
            match parsed {
                Ok(cmd) => Classified::Command(cmd),
                Err(err) => Classified::Dropped(DropReason::Command(err)),
            }
        }
        MessageKind::Unknown => Classified::Dropped(DropReason::UnknownKind),
    }
}
