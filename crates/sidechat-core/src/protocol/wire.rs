//! Poll/send JSON bodies.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of a successful poll response.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBatch {
    /// Messages newer than the requested cursor, in server order.
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
}

/// Message kind tag (field name is `type` in JSON).
///
/// Unrecognized values deserialize to `Unknown` instead of failing the
/// batch; the classifier drops them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Transcript line.
    Text,
    /// Playback command.
    Command,
    /// Anything else (forward compatibility).
    #[default]
    #[serde(other)]
    Unknown,
}

/// One inbound message.
///
/// Only one semantic payload (text vs command+args) is meaningful per kind;
/// the other is ignored if present.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    /// Opaque server-assigned id, compared only for "latest seen"
    /// bookkeeping. The server may encode it as a string or a number; both
    /// are accepted and kept in textual form for the next `since_id`.
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: Option<String>,
    /// Message kind.
    #[serde(default, rename = "type")]
    pub kind: MessageKind,
    /// Display name of the author (text messages).
    #[serde(default)]
    pub user: Option<String>,
    /// Transcript text (text messages).
    #[serde(default)]
    pub text: Option<String>,
    /// Command name (command messages).
    #[serde(default)]
    pub command: Option<String>,
    /// Command arguments (command messages).
    #[serde(default)]
    pub args: Option<Map<String, Value>>,
}

/// Body of the outbound send request.
///
/// `session_id` serializes as `null` when unconfigured.
#[derive(Debug, Serialize)]
pub struct SendBody<'a> {
    pub message: &'a str,
    pub session_id: Option<&'a str>,
}

/// Accept string or numeric ids; anything else is treated as absent.
fn opaque_id<'de, D>(de: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
