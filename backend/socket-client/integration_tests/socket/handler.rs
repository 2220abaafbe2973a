use crate::helpers::{Observed, next_event, observe, serve_once, start_song_server, unused_endpoint};

use socket_client::error::SocketError;
use socket_client::socket::{ConnectionState, SocketHandler, close_code};

use models::ClientMessage;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

/// **VALUE**: Verifies the full round trip against the real search server.
///
/// **WHY THIS MATTERS**: Connect, send a search, get typed results back: the path every
/// user keystroke takes.
///
/// **BUG THIS CATCHES**: Would catch mismatched wire tags between client and server, or
/// results handed to the wrong handler.
#[tokio::test]
async fn given_search_server_when_search_sent_then_results_handler_receives_matches() {
    // GIVEN: A connected socket
    let server = start_song_server().await;
    let socket = SocketHandler::new(server.endpoint());
    let mut events = observe(&socket);
    assert!(matches!(next_event(&mut events).await, Observed::Connect));
    assert_eq!(socket.state(), ConnectionState::Open);

    // WHEN: Searching "b"
    socket
        .send(&ClientMessage::Search("b".to_string()))
        .expect("Send on open socket should succeed");

    // THEN: Results in catalog order, and the receive time is stamped
    match next_event(&mut events).await {
        Observed::Results(songs) => {
            assert_eq!(songs, vec!["Blue Monday", "blackbird", "Bohemian Rhapsody"]);
        }
        other => panic!("Expected results, got {other:?}"),
    }
    assert!(socket.last_message().is_some());

    server.shutdown();
}

/// **VALUE**: Verifies a client-initiated disconnect reports a normal closure.
///
/// **WHY THIS MATTERS**: Handlers distinguish a deliberate quit from a dropped connection
/// by the close code.
///
/// **BUG THIS CATCHES**: Would catch the transport tearing down without a close handshake
/// (1006) or never reporting the disconnect.
#[tokio::test]
async fn given_open_socket_when_disconnect_then_disconnect_handler_gets_normal_close() {
    // GIVEN: A connected socket
    let server = start_song_server().await;
    let socket = SocketHandler::new(server.endpoint());
    let mut events = observe(&socket);
    assert!(matches!(next_event(&mut events).await, Observed::Connect));

    // WHEN: Disconnecting
    socket.disconnect();

    // THEN: Disconnect with code 1000, state Closed
    match next_event(&mut events).await {
        Observed::Disconnect(close) => assert!(close.is_normal(), "Got {close:?}"),
        other => panic!("Expected disconnect, got {other:?}"),
    }
    assert_eq!(socket.state(), ConnectionState::Closed);
    assert!(matches!(
        socket.send(&ClientMessage::Search("b".to_string())),
        Err(SocketError::SendOnClosed { state: ConnectionState::Closed, .. })
    ));

    server.shutdown();
}

/// **VALUE**: Verifies dialing a dead endpoint reports an error then an abnormal close.
///
/// **WHY THIS MATTERS**: With the server down the UI must learn about it through the
/// handlers, since `connect` itself never fails.
///
/// **BUG THIS CATCHES**: Would catch dial failures being swallowed or reported as a clean
/// close.
#[tokio::test]
async fn given_no_server_when_connecting_then_error_then_abnormal_disconnect() {
    // GIVEN: An endpoint nothing listens on
    let endpoint = unused_endpoint().await;

    // WHEN: Connecting
    let socket = SocketHandler::new(endpoint);
    let mut events = observe(&socket);

    // THEN: Transport error, then Disconnect 1006
    assert!(matches!(
        next_event(&mut events).await,
        Observed::Error(SocketError::Transport { .. })
    ));
    match next_event(&mut events).await {
        Observed::Disconnect(close) => assert_eq!(close.code, close_code::ABNORMAL),
        other => panic!("Expected disconnect, got {other:?}"),
    }
    assert_eq!(socket.state(), ConnectionState::Closed);
}

/// **VALUE**: Verifies a non-forced reconnect cycles the connection to the same endpoint.
///
/// **WHY THIS MATTERS**: The `:reconnect` command must leave the client usable again.
///
/// **BUG THIS CATCHES**: Would catch reconnect forgetting the endpoint or leaving the old
/// transport as the current one.
#[tokio::test]
async fn given_open_socket_when_reconnect_not_forced_then_disconnects_and_connects_again() {
    // GIVEN: A connected socket
    let server = start_song_server().await;
    let socket = SocketHandler::new(server.endpoint());
    let mut events = observe(&socket);
    assert!(matches!(next_event(&mut events).await, Observed::Connect));

    // WHEN: Reconnecting
    socket.reconnect(false);

    // THEN: Old transport closes normally, a new one opens, and searching works
    let mut saw_disconnect = false;
    let mut saw_connect = false;
    while !(saw_disconnect && saw_connect) {
        match next_event(&mut events).await {
            Observed::Disconnect(close) => {
                assert!(close.is_normal(), "Got {close:?}");
                saw_disconnect = true;
            }
            Observed::Connect => saw_connect = true,
            other => panic!("Unexpected event {other:?}"),
        }
    }
    assert_eq!(socket.endpoint(), server.endpoint());

    socket
        .send(&ClientMessage::Search("yes".to_string()))
        .expect("Send after reconnect should succeed");
    match next_event(&mut events).await {
        Observed::Results(songs) => assert_eq!(songs, vec!["Yesterday"]),
        other => panic!("Expected results, got {other:?}"),
    }

    server.shutdown();
}

/// **VALUE**: Verifies a server close code reaches the Disconnect handler unchanged.
///
/// **WHY THIS MATTERS**: 1011 and 1012 mean different things to the user (crash versus
/// restart); the code must survive the trip.
///
/// **BUG THIS CATCHES**: Would catch every server close being flattened to 1000 or 1006.
#[tokio::test]
async fn given_server_closing_with_1012_when_observed_then_disconnect_carries_code() {
    // GIVEN: A server that closes with "service restart" right after the handshake
    let endpoint = serve_once(|mut ws| async move {
        let frame = CloseFrame {
            code: CloseCode::Restart,
            reason: "restarting".to_string().into(),
        };
        let _ = ws.close(Some(frame)).await;
        while ws.next().await.is_some() {}
    })
    .await;

    // WHEN: Connecting
    let socket = SocketHandler::new(endpoint);
    let mut events = observe(&socket);

    // THEN: Connect, then Disconnect 1012 with the reason
    assert!(matches!(next_event(&mut events).await, Observed::Connect));
    match next_event(&mut events).await {
        Observed::Disconnect(close) => {
            assert_eq!(close.code, close_code::SERVICE_RESTART);
            assert_eq!(close.reason, "restarting");
        }
        other => panic!("Expected disconnect, got {other:?}"),
    }
}

/// **VALUE**: Verifies a garbage frame is reported and later frames still dispatch.
///
/// **WHY THIS MATTERS**: One malformed frame from the server must not wedge the client.
///
/// **BUG THIS CATCHES**: Would catch decode failures stopping the routing task.
#[tokio::test]
async fn given_server_sending_garbage_then_results_when_observed_then_error_then_results() {
    // GIVEN: A server that sends a bad frame followed by a good one
    let endpoint = serve_once(|ws| async move {
        let (mut write, mut read) = ws.split();
        let _ = write.send(Message::Text("{not json".into())).await;
        let _ = write
            .send(Message::Text(r#"{"SearchResults":["Yesterday"]}"#.into()))
            .await;
        while read.next().await.is_some() {}
    })
    .await;

    // WHEN: Connecting
    let socket = SocketHandler::new(endpoint);
    let mut events = observe(&socket);

    // THEN: Connect, decode error, results in order
    assert!(matches!(next_event(&mut events).await, Observed::Connect));
    assert!(matches!(
        next_event(&mut events).await,
        Observed::Error(SocketError::Decode { .. })
    ));
    match next_event(&mut events).await {
        Observed::Results(songs) => assert_eq!(songs, vec!["Yesterday"]),
        other => panic!("Expected results, got {other:?}"),
    }

    socket.disconnect();
}
