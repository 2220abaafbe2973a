//! WebSocket transport on `tokio-tungstenite`.
//!
//! Each opened transport is a background task that owns the socket. It reads
//! commands from the handle and reports everything it sees as
//! [`TransportEvent`]s:
//!
//! - dial failure: `Error`, then `Close(1006)`
//! - `Close` while still dialing: the dial is abandoned, `Close(1006)`
//! - client close: a 1000 close frame is sent, the server's reply is reported
//! - close frame without status: `Close(1005)`
//! - read or write failure: `Error`, then `Close(1006)`
//!
//! If every handle is dropped the task keeps reading until the peer closes.

use crate::error::SocketError;
use crate::socket::close_code::{self, CloseInfo};
use crate::socket::connection_state::{ConnectionState, ConnectionStatus};
use crate::socket::transport::{
    Connector, Frame, TransportCommand, TransportEvent, TransportHandle,
};

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::spawn as TokioSpawn;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

const CLIENT_CLOSE_REASON: &str = "client disconnect";

/// Production [`Connector`] speaking plain WebSocket (`ws://`). Built without TLS.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn open(&self, endpoint: &str, events: UnboundedSender<TransportEvent>) -> TransportHandle {
        let (commands_tx, commands_rx) = unbounded_channel();
        let status = ConnectionStatus::new(ConnectionState::Connecting);
        let handle = TransportHandle::new(endpoint, status.clone(), commands_tx);

        TokioSpawn(run_transport(
            endpoint.to_string(),
            status,
            commands_rx,
            events,
        ));

        handle
    }
}

async fn run_transport(
    endpoint: String,
    status: ConnectionStatus,
    mut commands: UnboundedReceiver<TransportCommand>,
    events: UnboundedSender<TransportEvent>,
) {
    let mut commands_open = true;
    let mut dial = Box::pin(connect_async(endpoint.as_str()));

    let ws_stream = loop {
        tokio::select! {
            result = &mut dial => match result {
                Ok((ws_stream, _response)) => break ws_stream,
                Err(e) => {
                    warn!("Failed to connect to {endpoint}: {e}");
                    status.set(ConnectionState::Closed);
                    let _ = events.send(TransportEvent::Error(SocketError::from(e)));
                    let _ = events.send(TransportEvent::Close(CloseInfo::abnormal(
                        "connection failed",
                    )));
                    return;
                }
            },
            command = commands.recv(), if commands_open => match command {
                Some(TransportCommand::Close) => {
                    info!("Connection to {endpoint} closed before it was established");
                    status.set(ConnectionState::Closed);
                    let _ = events.send(TransportEvent::Close(CloseInfo::abnormal(
                        "closed before the connection was established",
                    )));
                    return;
                }
                Some(TransportCommand::Send(_)) => {
                    warn!("Dropping frame queued before {endpoint} was open");
                }
                None => commands_open = false,
            },
        }
    };

    info!("Connected to {endpoint}");
    status.set(ConnectionState::Open);
    let _ = events.send(TransportEvent::Open);

    let (mut write, mut read) = ws_stream.split();
    let mut close_info: Option<CloseInfo> = None;

    loop {
        tokio::select! {
            command = commands.recv(), if commands_open => match command {
                Some(TransportCommand::Send(text)) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        warn!("Failed to send frame to {endpoint}: {e}");
                        let _ = events.send(TransportEvent::Error(SocketError::from(e)));
                        close_info = Some(CloseInfo::abnormal("send failed"));
                        break;
                    }
                }
                Some(TransportCommand::Close) => {
                    if status.get() == ConnectionState::Open {
                        status.set(ConnectionState::Closing);
                        let frame = CloseFrame {
                            code: CloseCode::Normal,
                            reason: CLIENT_CLOSE_REASON.to_string().into(),
                        };
                        if let Err(e) = write.send(Message::Close(Some(frame))).await {
                            debug!("Close frame to {endpoint} not delivered: {e}");
                        }
                    }
                }
                None => commands_open = false,
            },
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(TransportEvent::Frame(Frame::Text(text.as_str().to_owned())));
                }
                Some(Ok(Message::Binary(bytes))) => {
                    let _ = events.send(TransportEvent::Frame(Frame::Binary(bytes.to_vec())));
                }
                Some(Ok(Message::Close(frame))) => {
                    status.set(ConnectionState::Closing);
                    close_info = Some(match frame {
                        Some(frame) => CloseInfo::new(u16::from(frame.code), frame.reason.as_str()),
                        None => CloseInfo::new(close_code::NO_STATUS_RECEIVED, ""),
                    });
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Connection to {endpoint} failed: {e}");
                    let _ = events.send(TransportEvent::Error(SocketError::from(e)));
                    close_info = Some(CloseInfo::abnormal("connection lost"));
                    break;
                }
                None => break,
            },
        }
    }

    let close_info = close_info.unwrap_or_else(|| CloseInfo::abnormal("connection lost"));
    info!(
        "Disconnected from {endpoint}: {} ({})",
        close_info.code,
        close_code::describe(close_info.code)
    );
    status.set(ConnectionState::Closed);
    let _ = events.send(TransportEvent::Close(close_info));
}
