//! Typed WebSocket client: lifecycle, decoding and dispatch.
//!
//! - [`SocketHandler`] - Connection Lifecycle Manager (connect, reconnect, disconnect, send)
//! - [`decode`] - Message Decoder (raw text → [`InboundMessage`])
//! - [`Dispatcher`] / [`HandlerRegistry`] - Dispatch Registry (tag → handler)
//! - [`Connector`] - transport seam, [`WsConnector`] for real sockets
//!
//! # Protocol
//!
//! Frames are UTF-8 JSON objects with one key: `{"<Tag>": <payload>}`. See the
//! `models` crate for the message types.
//!
//! # Errors
//!
//! Transport and decode failures reach the `Error` lifecycle handler (or are
//! dropped when none is registered). Messages without a handler are reported to
//! the [`DiagnosticSink`]. Only `send` returns errors to its caller.

pub mod close_code;
mod connection_state;
mod decoder;
mod diagnostics;
mod dispatcher;
mod event;
mod handler;
mod registry;
mod transport;
mod ws_transport;

pub use close_code::CloseInfo;
pub use connection_state::{ConnectionState, ConnectionStatus};
pub use decoder::{InboundMessage, decode};
pub use diagnostics::{DiagnosticSink, LogSink};
pub use dispatcher::Dispatcher;
pub use event::{LifecycleEvent, LifecycleTag, LifecycleVariant, OnConnect, OnDisconnect, OnError};
pub use handler::{SocketHandler, SocketHandlerBuilder};
pub use registry::HandlerRegistry;
pub use transport::{Connector, Frame, TransportCommand, TransportEvent, TransportHandle};
pub use ws_transport::WsConnector;
