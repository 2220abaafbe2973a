//! Seam between the socket wrapper and whatever carries its frames.
//!
//! A [`Connector`] opens transports. Opening never blocks: the connector hands
//! back a [`TransportHandle`] immediately and reports progress as
//! [`TransportEvent`]s on the channel it was given. The wrapper consumes that
//! channel; it never touches the underlying socket.
//!
//! [`WsConnector`](crate::socket::WsConnector) is the production connector.

use crate::error::SocketError;
use crate::socket::close_code::CloseInfo;
use crate::socket::connection_state::{ConnectionState, ConnectionStatus};

use common::ErrorLocation;

use std::panic::Location;

use tokio::sync::mpsc::{UnboundedSender, error::SendError};
use uuid::Uuid;

/// Opens transports to an endpoint.
pub trait Connector: Send + Sync + 'static {
    /// Starts connecting to `endpoint` and returns at once.
    ///
    /// The implementation must deliver, in order, everything that happens to the
    /// transport on `events` and keep the handle's [`ConnectionStatus`] current.
    /// A transport that fails to open reports `Error` and then `Close`.
    fn open(&self, endpoint: &str, events: UnboundedSender<TransportEvent>) -> TransportHandle;
}

/// Something that happened on a transport.
#[derive(Debug)]
pub enum TransportEvent {
    Open,
    Frame(Frame),
    Close(CloseInfo),
    Error(SocketError),
}

/// One inbound frame as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

impl Frame {
    /// Extracts the text payload. Binary frames must hold UTF-8.
    pub fn into_text(self) -> Result<String, SocketError> {
        match self {
            Frame::Text(text) => Ok(text),
            Frame::Binary(bytes) => String::from_utf8(bytes).map_err(|e| SocketError::Decode {
                message: format!("Binary frame is not valid UTF-8: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Instructions from the wrapper to the transport task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    Send(String),
    Close,
}

/// The wrapper's side of an open (or opening) transport.
///
/// Dropping the handle does not close the transport; only [`TransportHandle::close`] does.
#[derive(Debug)]
pub struct TransportHandle {
    id: Uuid,
    endpoint: String,
    status: ConnectionStatus,
    commands: UnboundedSender<TransportCommand>,
}

impl TransportHandle {
    pub fn new(
        endpoint: impl Into<String>,
        status: ConnectionStatus,
        commands: UnboundedSender<TransportCommand>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            endpoint: endpoint.into(),
            status,
            commands,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.status.get()
    }

    /// Queues a text frame. The caller checks that the transport is open.
    #[track_caller]
    pub(crate) fn send_text(&self, text: String) -> Result<(), SocketError> {
        match self.commands.send(TransportCommand::Send(text)) {
            Ok(()) => Ok(()),
            Err(SendError(_)) => Err(SocketError::SendOnClosed {
                state: ConnectionState::Closed,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Asks the transport to close. A transport that already finished ignores it.
    pub(crate) fn close(&self) {
        let _ = self.commands.send(TransportCommand::Close);
    }
}
