use crate::socket::ConnectionState;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;
use tokio_tungstenite::tungstenite::Error as TungsteniteError;

/// Failures raised by the socket wrapper.
///
/// `Transport` and `Decode` are never returned to callers; they travel through the
/// `Error` lifecycle handler. `SendOnClosed` and `Serialize` are returned by
/// [`SocketHandler::send`](crate::socket::SocketHandler::send).
#[derive(Debug, Clone, ThisError)]
pub enum SocketError {
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Send Error: transport is {state} {location}")]
    SendOnClosed {
        state: ConnectionState,
        location: ErrorLocation,
    },

    #[error("Serialize Error: {message} {location}")]
    Serialize {
        message: String,
        location: ErrorLocation,
    },
}

impl From<TungsteniteError> for SocketError {
    #[track_caller]
    fn from(error: TungsteniteError) -> Self {
        SocketError::Transport {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
