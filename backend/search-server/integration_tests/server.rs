use search_server::{Catalog, start_search_server};

use models::{ClientMessage, ServerMessage};

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

fn songs() -> Catalog {
    Catalog::from_names(["Blue Monday", "blackbird", "Bohemian Rhapsody", "Yesterday"])
}

async fn next_reply<S>(read: &mut S) -> ServerMessage
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = timeout(REPLY_TIMEOUT, read.next())
            .await
            .expect("Timed out waiting for reply")
            .expect("Stream ended")
            .expect("Read failed");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Reply should be a ServerMessage");
        }
    }
}

/// **VALUE**: Verifies a real client gets prefix results over the wire.
///
/// **WHY THIS MATTERS**: This is the whole product: type a prefix, get matching songs.
///
/// **BUG THIS CATCHES**: Would catch wrong reply tags, wrong JSON shape, or a server that
/// never answers.
#[tokio::test]
async fn given_running_server_when_client_searches_then_receives_matching_results() {
    // GIVEN: A server on an ephemeral port
    let server = start_search_server(0, songs()).await.expect("Server should start");
    let (ws, _) = connect_async(server.endpoint()).await.expect("Client should connect");
    let (mut write, mut read) = ws.split();

    // WHEN: Searching "bl"
    let request = serde_json::to_string(&ClientMessage::Search("bl".to_string())).unwrap();
    write.send(Message::Text(request.into())).await.unwrap();

    // THEN: Matches in catalog order
    assert_eq!(
        next_reply(&mut read).await,
        ServerMessage::SearchResults(vec!["Blue Monday".to_string(), "blackbird".to_string()])
    );

    server.shutdown();
}

/// **VALUE**: Verifies a garbage frame does not kill the connection.
///
/// **WHY THIS MATTERS**: One bad client message must not force a reconnect.
///
/// **BUG THIS CATCHES**: Would catch the connection task returning on a parse failure.
#[tokio::test]
async fn given_unparsable_frame_when_followed_by_search_then_search_still_answered() {
    // GIVEN: A connected client
    let server = start_search_server(0, songs()).await.expect("Server should start");
    let (ws, _) = connect_async(server.endpoint()).await.expect("Client should connect");
    let (mut write, mut read) = ws.split();

    // WHEN: Sending garbage, then a valid search
    write.send(Message::Text("not json".into())).await.unwrap();
    let request = serde_json::to_string(&ClientMessage::Search("yes".to_string())).unwrap();
    write.send(Message::Text(request.into())).await.unwrap();

    // THEN: The valid search is answered
    assert_eq!(
        next_reply(&mut read).await,
        ServerMessage::SearchResults(vec!["Yesterday".to_string()])
    );

    server.shutdown();
}

/// **VALUE**: Verifies requests on one connection are answered in order.
///
/// **WHY THIS MATTERS**: The client shows the latest results; out-of-order replies would
/// leave stale results on screen.
///
/// **BUG THIS CATCHES**: Would catch per-request spawning that reorders replies.
#[tokio::test]
async fn given_two_searches_when_sent_back_to_back_then_replies_arrive_in_order() {
    // GIVEN: A connected client
    let server = start_search_server(0, songs()).await.expect("Server should start");
    let (ws, _) = connect_async(server.endpoint()).await.expect("Client should connect");
    let (mut write, mut read) = ws.split();

    // WHEN: Two searches without waiting
    for term in ["bo", "zzz"] {
        let request = serde_json::to_string(&ClientMessage::Search(term.to_string())).unwrap();
        write.send(Message::Text(request.into())).await.unwrap();
    }

    // THEN: Replies in request order
    assert_eq!(
        next_reply(&mut read).await,
        ServerMessage::SearchResults(vec!["Bohemian Rhapsody".to_string()])
    );
    assert_eq!(next_reply(&mut read).await, ServerMessage::SearchResults(vec![]));

    server.shutdown();
}

/// **VALUE**: Verifies the handle reports the bound port and a dialable endpoint.
///
/// **WHY THIS MATTERS**: Port 0 is how tests and tooling avoid collisions; they need the
/// real address back.
///
/// **BUG THIS CATCHES**: Would catch the handle reporting port 0 instead of the bound port.
#[tokio::test]
async fn given_port_zero_when_started_then_handle_reports_bound_endpoint() {
    let server = start_search_server(0, Catalog::default()).await.expect("Server should start");

    let addr = server.local_addr();
    assert_ne!(addr.port(), 0);
    assert_eq!(server.endpoint(), format!("ws://127.0.0.1:{}/search", addr.port()));

    server.shutdown();
}

/// **VALUE**: Verifies binding an occupied port fails with an IO error.
///
/// **WHY THIS MATTERS**: A second server instance must fail at startup rather than appear
/// to run.
///
/// **BUG THIS CATCHES**: Would catch a bind error being swallowed.
#[tokio::test]
async fn given_port_in_use_when_started_then_returns_io_error() {
    let first = start_search_server(0, Catalog::default()).await.expect("Server should start");

    let second = start_search_server(first.local_addr().port(), Catalog::default()).await;

    assert!(matches!(second, Err(search_server::ServerError::Io { .. })));
    first.shutdown();
}

/// **VALUE**: Verifies upgrades are only accepted on the search route.
///
/// **WHY THIS MATTERS**: Clients configured with a wrong path must fail at connect time
/// instead of talking to a server that silently answers on any URL.
///
/// **BUG THIS CATCHES**: Would catch the handshake ignoring the request path.
#[tokio::test]
async fn given_running_server_when_client_dials_other_path_then_rejected_with_404() {
    // GIVEN: A server on an ephemeral port
    let server = start_search_server(0, songs()).await.expect("Server should start");
    let wrong_path = format!("ws://{}/not-search", server.local_addr());

    // WHEN: Dialing a path other than /search
    let result = connect_async(wrong_path).await;

    // THEN: The upgrade is refused with 404, and /search still works
    match result {
        Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
            assert_eq!(response.status(), 404);
        }
        Err(other) => panic!("Expected an HTTP rejection, got {other}"),
        Ok(_) => panic!("Upgrade on the wrong path should fail"),
    }
    assert!(connect_async(server.endpoint()).await.is_ok());

    server.shutdown();
}
