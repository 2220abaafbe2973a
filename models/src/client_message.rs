use serde::{Deserialize, Serialize};

pub const SEARCH_TAG: &str = "Search";

/// Messages sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    /// Prefix search over song names.
    Search(String),
}

impl ClientMessage {
    /// Variant tag as it appears on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            ClientMessage::Search(_) => SEARCH_TAG,
        }
    }
}
