//! Connection state of a single transport.
//!
//! The transport task writes the state; the handler reads it to guard `send`
//! and `reconnect`. Each transport owns its own [`ConnectionStatus`], so a
//! replaced transport keeps reporting its own state until it finishes.

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one transport: `Connecting → Open → Closing → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }
}

impl Display for ConnectionState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let label = match self {
            ConnectionState::Connecting => "Connecting",
            ConnectionState::Open => "Open",
            ConnectionState::Closing => "Closing",
            ConnectionState::Closed => "Closed",
        };
        formatter.write_str(label)
    }
}

/// Shared, cloneable view of a transport's [`ConnectionState`].
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    state: Arc<AtomicU8>,
}

impl ConnectionStatus {
    pub fn new(initial: ConnectionState) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(initial as u8)),
        }
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn set(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.get() == ConnectionState::Open
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new(ConnectionState::Connecting)
    }
}
