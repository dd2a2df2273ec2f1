//! Decoding of `{"command": ..., "payload": {...}}` envelopes.
//!
//! Payloads are optional: a missing, `null`, or empty payload is accepted for
//! commands without arguments, and extra payload fields sent to such commands
//! are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use match_core::MatchCommand;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed command envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("invalid payload for `{command}`: {source}")]
    InvalidPayload {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    command: String,
    #[serde(default)]
    payload: Value,
}

/// Decodes one JSON text into a [`MatchCommand`].
pub fn decode_command(text: &str) -> Result<MatchCommand, DecodeError> {
    let envelope: Envelope = serde_json::from_str(text).map_err(DecodeError::Malformed)?;
    decode_parts(envelope.command, envelope.payload)
}

/// Decodes an already-parsed envelope value.
pub fn decode_value(value: Value) -> Result<MatchCommand, DecodeError> {
    let envelope: Envelope = serde_json::from_value(value).map_err(DecodeError::Malformed)?;
    decode_parts(envelope.command, envelope.payload)
}

fn decode_parts(command: String, payload: Value) -> Result<MatchCommand, DecodeError> {
    if !MatchCommand::is_known(&command) {
        return Err(DecodeError::UnknownCommand(command));
    }

    let payload = match payload {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    let with_payload = serde_json::json!({ "command": command, "payload": payload });
    let first_error = match serde_json::from_value(with_payload) {
        Ok(decoded) => return Ok(decoded),
        Err(err) => err,
    };

    // Commands without arguments decode from the bare tag.
    let bare = serde_json::json!({ "command": command });
    serde_json::from_value(bare).map_err(|_| DecodeError::InvalidPayload {
        command,
        source: first_error,
    })
}
