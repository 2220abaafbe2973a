//! Real-socket fixtures: a search server, a scripted one-shot server and a
//! channel-backed observer for handler callbacks.

use socket_client::error::SocketError;
use socket_client::socket::{CloseInfo, OnConnect, OnDisconnect, OnError, SocketHandler};

use models::SearchResults;
use search_server::{Catalog, SearchServerHandle, start_search_server};

use std::future::Future;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::timeout;
use tokio_tungstenite::{WebSocketStream, accept_async};

pub const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything a handler can be called with, in arrival order.
#[derive(Debug)]
pub enum Observed {
    Connect,
    Disconnect(CloseInfo),
    Error(SocketError),
    Results(Vec<String>),
}

pub async fn start_song_server() -> SearchServerHandle {
    let catalog = Catalog::from_names(["Blue Monday", "blackbird", "Bohemian Rhapsody", "Yesterday"]);
    start_search_server(0, catalog)
        .await
        .expect("Search server should start")
}

/// Accepts one WebSocket client on an ephemeral port and hands it to `script`.
pub async fn serve_once<F, Fut>(script: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let ws = accept_async(stream).await.expect("handshake");
        script(ws).await;
    });

    format!("ws://{addr}/search")
}

/// An endpoint nothing listens on.
pub async fn unused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("ws://{addr}/search")
}

/// Registers every handler on `socket`, forwarding calls into the returned channel.
pub fn observe(socket: &SocketHandler) -> UnboundedReceiver<Observed> {
    let (tx, rx) = unbounded_channel();

    let on_connect = tx.clone();
    let on_disconnect = tx.clone();
    let on_error = tx.clone();
    socket
        .register::<SearchResults>(move |songs| {
            let _ = tx.send(Observed::Results(songs));
        })
        .register_lifecycle::<OnConnect>(move |()| {
            let _ = on_connect.send(Observed::Connect);
        })
        .register_lifecycle::<OnDisconnect>(move |close| {
            let _ = on_disconnect.send(Observed::Disconnect(close));
        })
        .register_lifecycle::<OnError>(move |error| {
            let _ = on_error.send(Observed::Error(error));
        });

    rx
}

pub async fn next_event(rx: &mut UnboundedReceiver<Observed>) -> Observed {
    timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("Timed out waiting for a handler call")
        .expect("Observer channel closed")
}
