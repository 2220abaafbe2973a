//! Connection Lifecycle Manager.
//!
//! [`SocketHandler`] owns one transport at a time, remembers the endpoint for
//! reconnects and routes everything the transport reports into the
//! [`Dispatcher`].
//!
//! # Event routing
//!
//! Every transport gets its own routing task reading that transport's event
//! channel. Frames of one transport are decoded and dispatched in arrival order.
//! A transport replaced by `connect` or `reconnect` keeps its routing task, so
//! its trailing `Disconnect` (and any frame already in flight) still reaches the
//! current handlers.
//!
//! # Runtime
//!
//! `connect` spawns onto the ambient tokio runtime. On a current-thread runtime
//! nothing is delivered until the caller yields, so handlers registered right
//! after construction observe every event, `Connect` included.

use crate::DEFAULT_ENDPOINT;
use crate::error::SocketError;
use crate::socket::close_code;
use crate::socket::connection_state::ConnectionState;
use crate::socket::diagnostics::{DiagnosticSink, LogSink};
use crate::socket::dispatcher::Dispatcher;
use crate::socket::event::{LifecycleEvent, LifecycleVariant};
use crate::socket::transport::{Connector, TransportEvent, TransportHandle};
use crate::socket::ws_transport::WsConnector;

use common::ErrorLocation;

use models::{ClientMessage, ServerVariant};

use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tokio::spawn as TokioSpawn;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use uuid::Uuid;

/// Typed client over a single persistent duplex connection.
///
/// # Examples
///
/// ```no_run
/// use models::SearchResults;
/// use socket_client::socket::{OnDisconnect, SocketHandler};
/// use models::ClientMessage;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let socket = SocketHandler::new("ws://127.0.0.1:8080/search");
///     socket
///         .register::<SearchResults>(|songs| println!("{songs:?}"))
///         .register_lifecycle::<OnDisconnect>(|close| println!("closed: {}", close.code));
///
///     // Fails with SendOnClosed until the transport is open.
///     let _ = socket.send(&ClientMessage::Search("Blue".to_string()));
/// }
/// ```
pub struct SocketHandler {
    dispatcher: Arc<Dispatcher>,
    connector: Arc<dyn Connector>,
    endpoint: Mutex<String>,
    transport: Mutex<Option<TransportHandle>>,
}

/// Builder for [`SocketHandler`] with a custom connector or diagnostic sink.
#[derive(Default)]
pub struct SocketHandlerBuilder {
    connector: Option<Arc<dyn Connector>>,
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
}

impl SocketHandlerBuilder {
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Builds a handler without connecting. The endpoint defaults to [`DEFAULT_ENDPOINT`].
    pub fn build(self) -> SocketHandler {
        let diagnostics = self.diagnostics.unwrap_or_else(|| Arc::new(LogSink));
        SocketHandler {
            dispatcher: Arc::new(Dispatcher::new(diagnostics)),
            connector: self.connector.unwrap_or_else(|| Arc::new(WsConnector)),
            endpoint: Mutex::new(DEFAULT_ENDPOINT.to_string()),
            transport: Mutex::new(None),
        }
    }

    /// Builds a handler and connects it to `endpoint`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn connect(self, endpoint: impl Into<String>) -> SocketHandler {
        let handler = self.build();
        handler.connect(endpoint);
        handler
    }
}

impl SocketHandler {
    /// Connects to `endpoint` over WebSocket, logging through `log`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::builder().connect(endpoint)
    }

    pub fn builder() -> SocketHandlerBuilder {
        SocketHandlerBuilder::default()
    }

    /// Opens a new transport to `endpoint` and remembers it for [`reconnect`](Self::reconnect).
    ///
    /// The previous transport, if any, is replaced but not closed. Failures are
    /// only reported through the `Error` lifecycle handler.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn connect(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        let diagnostics = self.dispatcher.diagnostics();
        diagnostics.info(&format!("Connecting to {endpoint}"));

        *lock(&self.endpoint) = endpoint.clone();

        let (events_tx, events_rx) = unbounded_channel();
        let transport = self.connector.open(&endpoint, events_tx);
        let transport_id = transport.id();

        TokioSpawn(route_events(
            events_rx,
            Arc::clone(&self.dispatcher),
            transport_id,
        ));

        if let Some(previous) = lock(&self.transport).replace(transport) {
            diagnostics.debug(&format!(
                "Transport {} ({}) replaced by {transport_id} without closing",
                previous.id(),
                previous.state()
            ));
        }
    }

    /// Closes the current transport and connects again to the stored endpoint.
    ///
    /// When the transport is open and `force` is `true` the call does nothing.
    pub fn reconnect(&self, force: bool) {
        if force && self.state() == ConnectionState::Open {
            self.dispatcher
                .diagnostics()
                .debug("Reconnect skipped: transport already open");
            return;
        }

        self.disconnect();
        let endpoint = lock(&self.endpoint).clone();
        self.connect(endpoint);
    }

    /// Asks the current transport to close.
    ///
    /// Returns immediately; the `Disconnect` handler runs once the transport
    /// reports the close.
    pub fn disconnect(&self) {
        if let Some(transport) = lock(&self.transport).as_ref() {
            self.dispatcher.diagnostics().debug(&format!(
                "Closing transport {} ({})",
                transport.id(),
                transport.state()
            ));
            transport.close();
        }
    }

    /// Serializes `message` and queues it on the current transport.
    ///
    /// # Errors
    ///
    /// - [`SocketError::SendOnClosed`] if there is no transport or it is not open;
    ///   nothing is transmitted
    /// - [`SocketError::Serialize`] if `message` cannot be encoded
    ///
    /// The error's location is the line that called `send`.
    #[track_caller]
    pub fn send(&self, message: &ClientMessage) -> Result<(), SocketError> {
        let guard = lock(&self.transport);
        let state = guard
            .as_ref()
            .map_or(ConnectionState::Closed, TransportHandle::state);

        let transport = match guard.as_ref() {
            Some(transport) if state == ConnectionState::Open => transport,
            _ => {
                return Err(SocketError::SendOnClosed {
                    state,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                return Err(SocketError::Serialize {
                    message: format!("Failed to serialize {}: {e}", message.tag()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        transport.send_text(text)
    }

    /// Binds `handler` to server messages tagged `V::TAG`, replacing any previous one.
    pub fn register<V: ServerVariant>(
        &self,
        handler: impl Fn(V::Payload) + Send + Sync + 'static,
    ) -> &Self {
        self.dispatcher.registry().register::<V>(handler);
        self
    }

    /// Binds `handler` to lifecycle events of kind `V::TAG`, replacing any previous one.
    pub fn register_lifecycle<V: LifecycleVariant>(
        &self,
        handler: impl Fn(V::Payload) + Send + Sync + 'static,
    ) -> &Self {
        self.dispatcher.registry().register_lifecycle::<V>(handler);
        self
    }

    /// When the last frame was successfully decoded, `None` before the first one.
    pub fn last_message(&self) -> Option<SystemTime> {
        self.dispatcher.last_message()
    }

    /// State of the current transport; `Closed` before the first `connect`.
    pub fn state(&self) -> ConnectionState {
        lock(&self.transport)
            .as_ref()
            .map_or(ConnectionState::Closed, TransportHandle::state)
    }

    pub fn endpoint(&self) -> String {
        lock(&self.endpoint).clone()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Routes one transport's events until the transport drops its sender.
async fn route_events(
    mut events: UnboundedReceiver<TransportEvent>,
    dispatcher: Arc<Dispatcher>,
    transport_id: Uuid,
) {
    while let Some(event) = events.recv().await {
        match event {
            TransportEvent::Open => {
                dispatcher
                    .diagnostics()
                    .debug(&format!("Transport {transport_id} open"));
                dispatcher.dispatch_lifecycle(LifecycleEvent::Connect);
            }
            TransportEvent::Frame(frame) => dispatcher.route_frame(frame),
            TransportEvent::Close(close) => {
                dispatcher.diagnostics().debug(&format!(
                    "Transport {transport_id} closed: {} ({}) {}",
                    close.code,
                    close_code::describe(close.code),
                    close.reason
                ));
                dispatcher.dispatch_lifecycle(LifecycleEvent::Disconnect(close));
            }
            TransportEvent::Error(error) => {
                dispatcher.dispatch_lifecycle(LifecycleEvent::Error(error));
            }
        }
    }
}
