//! Search server handle type.

use models::SEARCH_PATH;

use std::net::SocketAddr;

use tokio::task::JoinHandle;

/// Handle to a running search server.
///
/// Returned by [`start_search_server`](crate::start_search_server). Dropping the
/// handle does **not** stop the server; call [`shutdown`](Self::shutdown) to stop
/// accepting connections. Connections already accepted run until their client
/// leaves.
pub struct SearchServerHandle {
    local_addr: SocketAddr,
    accept_task: JoinHandle<()>,
}

impl SearchServerHandle {
    pub(crate) fn new(local_addr: SocketAddr, accept_task: JoinHandle<()>) -> Self {
        Self {
            local_addr,
            accept_task,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// WebSocket endpoint clients should dial, e.g. `ws://127.0.0.1:8080/search`.
    pub fn endpoint(&self) -> String {
        format!("ws://{}{}", self.local_addr, SEARCH_PATH)
    }

    /// Stops accepting new connections.
    pub fn shutdown(self) {
        self.accept_task.abort();
    }
}
