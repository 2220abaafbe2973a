//! Server → client messages and their compile-time variant markers.
//!
//! [`ServerMessage`] is the closed sum type the server produces. Handlers on the
//! client side are keyed by tag and typed by payload; [`ServerVariant`] ties the
//! two together so a handler registered for [`SearchResults`] can only ever be
//! handed a `Vec<String>`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const SEARCH_RESULTS_TAG: &str = "SearchResults";

/// Messages sent from the server to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Song names matching a `Search` request, in catalog order.
    SearchResults(Vec<String>),
}

impl ServerMessage {
    /// Variant tag as it appears on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            ServerMessage::SearchResults(_) => SEARCH_RESULTS_TAG,
        }
    }
}

/// A single [`ServerMessage`] variant, known at compile time.
///
/// `TAG` must equal the key serde writes for the variant and `Payload` must
/// deserialize from the value stored under that key.
pub trait ServerVariant: 'static {
    const TAG: &'static str;
    type Payload: DeserializeOwned;
}

/// Marker for [`ServerMessage::SearchResults`].
#[derive(Debug, Clone, Copy)]
pub struct SearchResults;

impl ServerVariant for SearchResults {
    const TAG: &'static str = SEARCH_RESULTS_TAG;
    type Payload = Vec<String>;
}
