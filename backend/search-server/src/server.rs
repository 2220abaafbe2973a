//! Search WebSocket server implementation.
//!
//! - Listens on localhost only
//! - Upgrades requests for `SEARCH_PATH` only, anything else gets a 404
//! - Text (or UTF-8 binary) JSON frames, one `ClientMessage` per frame
//! - Answers each `Search` with one `SearchResults` text frame
//! - Ignores frames it cannot parse; the connection stays up

use crate::SEARCH_SERVER_BIND_HOSTNAME;
use crate::catalog::Catalog;
use crate::error::ServerError;
use crate::handle::SearchServerHandle;

use common::ErrorLocation;

use models::{ClientMessage, SEARCH_PATH, ServerMessage};

use std::net::SocketAddr;
use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::spawn as TokioSpawn;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::{WebSocketStream, accept_hdr_async};

type WsWrite = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Starts the search server on `127.0.0.1:<port>`.
///
/// Port `0` lets the OS pick a free port; read it back from
/// [`SearchServerHandle::local_addr`].
///
/// # Errors
///
/// Returns [`ServerError::Io`] if the port is in use or cannot be bound.
pub async fn start_search_server(
    port: u16,
    catalog: Catalog,
) -> Result<SearchServerHandle, ServerError> {
    let address = format!("{SEARCH_SERVER_BIND_HOSTNAME}:{port}");
    let listener = TcpListener::bind(&address).await?;
    let local_addr = listener.local_addr()?;

    info!(
        "Search server listening on {} ({} songs)",
        local_addr,
        catalog.len()
    );

    let catalog = Arc::new(catalog);
    let accept_task = TokioSpawn(async move {
        while let Ok((stream, addr)) = listener.accept().await {
            info!("Client connecting from {}", addr);
            let catalog = Arc::clone(&catalog);
            TokioSpawn(async move {
                if let Err(e) = handle_connection(stream, addr, catalog).await {
                    error!("Connection {} ended with error: {}", addr, e);
                }
            });
        }
    });

    Ok(SearchServerHandle::new(local_addr, accept_task))
}

/// Serves one client until it disconnects.
///
/// # Errors
///
/// - [`ServerError::Handshake`] - WebSocket upgrade failed or the path is not `SEARCH_PATH`
/// - [`ServerError::Read`] - Reading from the client failed
/// - [`ServerError::Send`] / [`ServerError::Encode`] - Answering failed
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    catalog: Arc<Catalog>,
) -> Result<(), ServerError> {
    let ws_stream = accept_hdr_async(stream, check_path)
        .await
        .map_err(|e| ServerError::Handshake {
            message: format!("WebSocket handshake failed: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let start = Instant::now();
    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        let text = match msg {
            Ok(Message::Text(text)) => text.as_str().to_owned(),
            Ok(Message::Binary(data)) => match String::from_utf8(data.to_vec()) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Client {} sent non-UTF-8 binary frame: {}", addr, e);
                    continue;
                }
            },
            Ok(_) => continue,
            Err(e) => {
                return Err(ServerError::Read {
                    message: format!("Error reading message from {addr}: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let request: ClientMessage = match serde_json::from_str(&text) {
            Ok(request) => request,
            Err(e) => {
                warn!("Ignoring unparsable frame from {}: {}", addr, e);
                continue;
            }
        };

        match request {
            ClientMessage::Search(term) => {
                let results = catalog.search(&term);
                let count = results.len();
                send_message(&mut write, &ServerMessage::SearchResults(results)).await?;
                debug!(
                    "Answered search {:?} from {} with {} results ({:?} since connect)",
                    term,
                    addr,
                    count,
                    start.elapsed()
                );
            }
        }
    }

    info!("Client {} disconnected", addr);
    Ok(())
}

/// Handshake callback: only `SEARCH_PATH` is routed.
fn check_path(request: &Request, response: Response) -> Result<Response, ErrorResponse> {
    let path = request.uri().path();
    if path == SEARCH_PATH {
        return Ok(response);
    }

    warn!("Rejecting WebSocket upgrade for unknown path {}", path);
    let mut rejection = ErrorResponse::new(Some(format!("No route for {path}")));
    *rejection.status_mut() = StatusCode::NOT_FOUND;
    Err(rejection)
}

/// Encodes `message` as JSON and sends it as a text frame.
async fn send_message(write: &mut WsWrite, message: &ServerMessage) -> Result<(), ServerError> {
    let json = serde_json::to_string(message).map_err(|e| ServerError::Encode {
        message: format!("Failed to encode {}: {e}", message.tag()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ServerError::Send {
            message: format!("Failed to send {}: {e}", message.tag()),
            location: ErrorLocation::from(Location::caller()),
        })
}
