use crate::error::SocketError;
use crate::socket::{
    CloseInfo, Dispatcher, Frame, LifecycleEvent, OnDisconnect, OnError, decode,
};
use crate::tests::helpers::RecordingSink;

use common::ErrorLocation;

use models::{SearchResults, ServerMessage};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

fn dispatcher_with_sink() -> (Dispatcher, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (Dispatcher::new(sink.clone()), sink)
}

/// **VALUE**: Verifies dispatch invokes exactly the handler for the message's tag, with its payload.
///
/// **WHY THIS MATTERS**: This is the core contract of the registry.
///
/// **BUG THIS CATCHES**: Would catch payload mix-ups or handlers firing more than once.
#[test]
fn given_registered_handler_when_message_dispatched_then_called_once_with_payload() {
    // GIVEN: A SearchResults handler
    let (dispatcher, _sink) = dispatcher_with_sink();
    let received = Arc::new(Mutex::new(Vec::new()));
    let captured = received.clone();
    dispatcher
        .registry()
        .register::<SearchResults>(move |songs| captured.lock().unwrap().push(songs));

    // WHEN: Dispatching a typed message
    let invoked = dispatcher.dispatch(ServerMessage::SearchResults(vec!["x".into()]).into());

    // THEN: One call with the payload
    assert_eq!(invoked, 1);
    assert_eq!(*received.lock().unwrap(), vec![vec!["x".to_string()]]);
}

/// **VALUE**: Verifies last write wins on re-registration.
///
/// **WHY THIS MATTERS**: UI components re-register when they remount; the stale closure
/// must never run again.
///
/// **BUG THIS CATCHES**: Would catch handlers being appended instead of replaced.
#[test]
fn given_handler_replaced_when_dispatched_then_only_latest_runs() {
    // GIVEN: A registered, then B registered for the same tag
    let (dispatcher, _sink) = dispatcher_with_sink();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let (a, b) = (first.clone(), second.clone());
    dispatcher
        .registry()
        .register::<SearchResults>(move |_| {
            a.fetch_add(1, Ordering::SeqCst);
        })
        .register::<SearchResults>(move |_| {
            b.fetch_add(1, Ordering::SeqCst);
        });

    // WHEN: Dispatching
    dispatcher.dispatch(decode(r#"{"SearchResults":[]}"#).unwrap());

    // THEN: Only B ran
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

/// **VALUE**: Verifies an unhandled tag is a warning, not an error, and still stamps `last_message`.
///
/// **WHY THIS MATTERS**: A newer server may send tags an older client does not know. That
/// must not break the connection or hide that traffic arrived.
///
/// **BUG THIS CATCHES**: Would catch the timestamp only being set when a handler matched, or
/// a missing handler surfacing as an Error event.
#[test]
fn given_no_handler_when_dispatched_then_warns_and_stamps_last_message() {
    // GIVEN: No handlers, an Error handler that must stay silent
    let (dispatcher, sink) = dispatcher_with_sink();
    let errors = Arc::new(AtomicUsize::new(0));
    let counter = errors.clone();
    dispatcher.registry().register_lifecycle::<OnError>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert!(dispatcher.last_message().is_none());
    let before = SystemTime::now();

    // WHEN: Dispatching an unknown tag
    let invoked = dispatcher.dispatch(decode(r#"{"NowPlaying":"x"}"#).unwrap());

    // THEN: Nothing ran, one warning, timestamp set
    assert_eq!(invoked, 0);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
    assert_eq!(
        sink.warnings(),
        vec!["No message handler found for message type NowPlaying".to_string()]
    );
    assert!(dispatcher.last_message().unwrap() >= before);
}

/// **VALUE**: Verifies `last_message` moves strictly forward with every decoded frame.
///
/// **WHY THIS MATTERS**: Callers use the timestamp to tell a live connection from a silent
/// one; a second frame that leaves it unchanged looks like no traffic at all.
///
/// **BUG THIS CATCHES**: Would catch the timestamp only being set once, or two frames in the
/// same clock tick sharing a timestamp.
#[test]
fn given_two_frames_when_dispatched_back_to_back_then_last_message_strictly_advances() {
    // GIVEN: A dispatcher with one handled and one unhandled tag
    let (dispatcher, _sink) = dispatcher_with_sink();
    dispatcher.registry().register::<SearchResults>(|_| {});

    // WHEN: Dispatching two frames without pause
    dispatcher.dispatch(decode(r#"{"SearchResults":["a"]}"#).unwrap());
    let first = dispatcher.last_message().expect("first stamp");
    dispatcher.dispatch(decode(r#"{"NowPlaying":"b"}"#).unwrap());
    let second = dispatcher.last_message().expect("second stamp");

    // THEN: The second stamp is later than the first
    assert!(second > first, "{second:?} should be after {first:?}");
}

/// **VALUE**: Verifies every key of a malformed multi-key frame is dispatched independently.
///
/// **WHY THIS MATTERS**: The server contract is single-key, but nothing enforces it; known
/// keys in a malformed frame must still reach their handlers.
///
/// **BUG THIS CATCHES**: Would catch dispatch stopping at the first key or at the first
/// unhandled key.
#[test]
fn given_multi_key_frame_when_dispatched_then_each_key_handled_independently() {
    // GIVEN: A SearchResults handler
    let (dispatcher, sink) = dispatcher_with_sink();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    dispatcher.registry().register::<SearchResults>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // WHEN: A frame with a known and an unknown key
    let invoked = dispatcher.dispatch(decode(r#"{"SearchResults":["a"],"Other":1}"#).unwrap());

    // THEN: Known key handled, unknown key warned
    assert_eq!(invoked, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(sink.warnings().len(), 1);
}

/// **VALUE**: Verifies a payload of the wrong type goes to the Error handler instead of the message handler.
///
/// **WHY THIS MATTERS**: Typed handlers must only ever see their declared payload type.
///
/// **BUG THIS CATCHES**: Would catch a panic inside dispatch on mistyped payloads.
#[test]
fn given_mistyped_payload_when_dispatched_then_error_handler_receives_decode_error() {
    // GIVEN: Message and Error handlers
    let (dispatcher, _sink) = dispatcher_with_sink();
    let messages = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(Mutex::new(Vec::new()));
    let (m, e) = (messages.clone(), errors.clone());
    dispatcher
        .registry()
        .register::<SearchResults>(move |_| {
            m.fetch_add(1, Ordering::SeqCst);
        })
        .register_lifecycle::<OnError>(move |error| e.lock().unwrap().push(error));

    // WHEN: SearchResults carries a number
    let invoked = dispatcher.dispatch(decode(r#"{"SearchResults":5}"#).unwrap());

    // THEN: Message handler untouched, one decode error
    assert_eq!(invoked, 0);
    assert_eq!(messages.load(Ordering::SeqCst), 0);
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], SocketError::Decode { .. }));
}

/// **VALUE**: Verifies a decode failure reaches the Error handler exactly once and nothing else.
///
/// **WHY THIS MATTERS**: Corrupt frames must be visible to the application without
/// triggering message handlers or stamping `last_message`.
///
/// **BUG THIS CATCHES**: Would catch partial dispatch of undecodable frames.
#[test]
fn given_non_json_frame_when_routed_then_error_handler_called_once() {
    // GIVEN: Message and Error handlers
    let (dispatcher, _sink) = dispatcher_with_sink();
    let messages = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(AtomicUsize::new(0));
    let (m, e) = (messages.clone(), errors.clone());
    dispatcher
        .registry()
        .register::<SearchResults>(move |_| {
            m.fetch_add(1, Ordering::SeqCst);
        })
        .register_lifecycle::<OnError>(move |_| {
            e.fetch_add(1, Ordering::SeqCst);
        });

    // WHEN: Routing garbage
    dispatcher.route_frame(Frame::Text("not json".to_string()));

    // THEN: One error, no message, no timestamp
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(messages.load(Ordering::SeqCst), 0);
    assert!(dispatcher.last_message().is_none());
}

/// **VALUE**: Verifies lifecycle dispatch hands the payload to the matching handler only.
///
/// **WHY THIS MATTERS**: The Disconnect handler needs the close code to decide whether to
/// offer a reconnect.
///
/// **BUG THIS CATCHES**: Would catch lifecycle events reaching the wrong handler, or a
/// missing handler being treated as an error.
#[test]
fn given_disconnect_handler_when_lifecycle_dispatched_then_receives_close_info() {
    // GIVEN: A Disconnect handler only
    let (dispatcher, _sink) = dispatcher_with_sink();
    let closes = Arc::new(Mutex::new(Vec::new()));
    let captured = closes.clone();
    dispatcher
        .registry()
        .register_lifecycle::<OnDisconnect>(move |close| captured.lock().unwrap().push(close));

    // WHEN: Dispatching Disconnect, then an unhandled Error
    let handled = dispatcher.dispatch_lifecycle(LifecycleEvent::Disconnect(CloseInfo::new(
        1012,
        "restart",
    )));
    let unhandled = dispatcher.dispatch_lifecycle(LifecycleEvent::Error(SocketError::Transport {
        message: "boom".to_string(),
        location: ErrorLocation::caller(),
    }));

    // THEN: Disconnect handled with its payload; Error dropped quietly
    assert!(handled);
    assert!(!unhandled);
    assert_eq!(*closes.lock().unwrap(), vec![CloseInfo::new(1012, "restart")]);
    assert!(dispatcher.last_message().is_none());
}

/// **VALUE**: Verifies a handler may register handlers while it runs.
///
/// **WHY THIS MATTERS**: Handlers are invoked outside the registry lock; a handler that swaps
/// itself out must not deadlock.
///
/// **BUG THIS CATCHES**: Would catch a handler being called while the map's lock is held.
#[test]
fn given_handler_that_reregisters_when_dispatched_then_no_deadlock() {
    // GIVEN: A handler that replaces itself on first call
    let (dispatcher, _sink) = dispatcher_with_sink();
    let dispatcher = Arc::new(dispatcher);
    let calls = Arc::new(AtomicUsize::new(0));
    let inner_dispatcher = Arc::downgrade(&dispatcher);
    let counter = calls.clone();
    dispatcher.registry().register::<SearchResults>(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(dispatcher) = inner_dispatcher.upgrade() {
            dispatcher.registry().register::<SearchResults>(|_| {});
        }
    });

    // WHEN: Dispatching twice
    dispatcher.dispatch(decode(r#"{"SearchResults":[]}"#).unwrap());
    dispatcher.dispatch(decode(r#"{"SearchResults":[]}"#).unwrap());

    // THEN: Original ran once, replacement took over
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
