//! Wire protocol for song search.
//!
//! Every frame exchanged with the search server is a JSON object with exactly
//! one key, the variant tag, mapped to that variant's payload:
//!
//! - client → server: `{"Search": "query text"}`
//! - server → client: `{"SearchResults": ["a", "b", "c"]}`
//!
//! ## Architecture
//!
//! - **models** (this crate): Pure data structures shared by both ends
//! - **socket-client**: Connection lifecycle, decoding and dispatch
//! - **search-server**: The backend answering `Search` requests
//!
//! Models carry no transport logic, they only define shapes and tags.

pub mod client_message;
pub mod server_message;

pub use client_message::ClientMessage;
pub use server_message::{SearchResults, ServerMessage, ServerVariant};

/// Route the search server accepts WebSocket upgrades on.
pub const SEARCH_PATH: &str = "/search";
