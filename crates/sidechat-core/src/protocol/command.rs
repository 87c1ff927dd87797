//! Playback command parsing.
//!
//! The command set is a closed enumeration; everything the server could send
//! that is not in it parses to an explicit error the classifier drops. This
//! keeps unknown/malformed input a local, exhaustively-matched decision
//! instead of string fallthrough at the player boundary.

use serde_json::{Map, Value};
use thiserror::Error;

/// A recognized playback command with validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Pause,
    Play,
    /// Rewind to the start, then play.
    Restart,
    Seek { time: f64 },
    Rate { value: f64 },
    Mute,
    Unmute,
    LoadSource { src: String, media_type: String },
}

/// Why a command message could not be turned into a [`PlayerCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Command name not in the closed set (forward compatibility: dropped,
    /// never an error to the server).
    #[error("unknown command: {0}")]
    Unknown(String),
    /// A required argument is missing or has the wrong type.
    #[error("{command}: missing or invalid argument `{arg}`")]
    BadArgument {
        command: &'static str,
        arg: &'static str,
    },
}

impl PlayerCommand {
    /// Parse a command name and argument map from the wire.
    ///
    /// Validation is minimal by design: numeric where playback needs a
    /// number, string where it needs a source descriptor. A command that
    /// fails validation is never partially applied.
    pub fn parse(name: &str, args: &Map<String, Value>) -> std::result::Result<Self, CommandError> {
        match name {
            "pause" => Ok(PlayerCommand::Pause),
            "play" => Ok(PlayerCommand::Play),
            "restart" => Ok(PlayerCommand::Restart),
            "mute" => Ok(PlayerCommand::Mute),
            "unmute" => Ok(PlayerCommand::Unmute),
            "seek" => number_arg(args, "seek", "time").map(|time| PlayerCommand::Seek { time }),
            "rate" => number_arg(args, "rate", "value").map(|value| PlayerCommand::Rate { value }),
            "loadSource" => {
                let src = string_arg(args, "loadSource", "src")?;
                let media_type = string_arg(args, "loadSource", "mediaType")?;
                Ok(PlayerCommand::LoadSource { src, media_type })
            }
            other => Err(CommandError::Unknown(other.to_owned())),
        }
    }
}

fn number_arg(
    args: &Map<String, Value>,
    command: &'static str,
    arg: &'static str,
) -> std::result::Result<f64, CommandError> {
    args.get(arg)
        .and_then(Value::as_f64)
        .ok_or(CommandError::BadArgument { command, arg })
}

fn string_arg(
    args: &Map<String, Value>,
    command: &'static str,
    arg: &'static str,
) -> std::result::Result<String, CommandError> {
    args.get(arg)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(CommandError::BadArgument { command, arg })
}
