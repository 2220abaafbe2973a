//! Shared building blocks for the song search workspace.
//!
//! Every error enum in the workspace records where it was raised through
//! [`ErrorLocation`], so a log line such as
//! `Send Error: transport is Connecting [backend/socket-client/src/socket/handler.rs:212:24]`
//! points straight at the failing call site.

pub mod error;

pub use error::error_location::ErrorLocation;
