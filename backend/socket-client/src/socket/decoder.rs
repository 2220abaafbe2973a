//! Message Decoder: raw text frame → [`InboundMessage`].
//!
//! Decoding is permissive. Any syntactically valid JSON is accepted; unknown
//! tags and malformed payloads are only noticed at dispatch time.

use crate::error::SocketError;

use common::ErrorLocation;

use models::ServerMessage;

use std::panic::Location;

use serde_json::{Map, Value};

/// A decoded frame: every top-level key is a tag, its value the payload.
///
/// Well-formed frames hold exactly one entry. Frames with several keys keep all
/// of them and each is dispatched on its own. A JSON value that is not an object
/// decodes to a message with no entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundMessage {
    entries: Map<String, Value>,
}

impl InboundMessage {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(entries) => Self { entries },
            _ => Self::default(),
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (String, Value)> {
        self.entries.into_iter()
    }
}

impl From<ServerMessage> for InboundMessage {
    fn from(message: ServerMessage) -> Self {
        serde_json::to_value(&message)
            .map(Self::from_value)
            .unwrap_or_default()
    }
}

/// Parses `raw` as JSON.
///
/// # Errors
///
/// Returns [`SocketError::Decode`] if `raw` is not valid JSON. Its location
/// points into the decoder: frames are decoded on the routing task, not at a
/// call site of the application.
pub fn decode(raw: &str) -> Result<InboundMessage, SocketError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| SocketError::Decode {
        message: format!("Failed to parse frame: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(InboundMessage::from_value(value))
}
