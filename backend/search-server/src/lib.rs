//! Song search backend.
//!
//! A WebSocket server answering `{"Search": "<term>"}` with
//! `{"SearchResults": [...]}`: the names in the [`Catalog`] that start with the
//! term, case-insensitively, in catalog order.
//!
//! The server binds to `127.0.0.1` only and keeps one task per connection.
//! Each connection handles its requests in order.

pub mod catalog;
pub mod error;
mod handle;
mod server;

pub use catalog::Catalog;
pub use error::ServerError;
pub use handle::SearchServerHandle;
pub use server::start_search_server;


pub const SEARCH_SERVER_BIND_HOSTNAME: &str = "127.0.0.1";
