use crate::socket::{ConnectionState, ConnectionStatus};

/// **VALUE**: Verifies that clones of a `ConnectionStatus` observe the same state.
///
/// **WHY THIS MATTERS**: The transport task writes the state through one clone and the
/// handler reads it through another to decide whether `send` may proceed.
///
/// **BUG THIS CATCHES**: Would catch the status being copied instead of shared, which would
/// leave the handler forever believing the transport is Connecting.
#[test]
fn given_cloned_status_when_original_updated_then_clone_observes_change() {
    // GIVEN: A status and its clone
    let status = ConnectionStatus::new(ConnectionState::Connecting);
    let observer = status.clone();

    // WHEN: The original moves to Open
    status.set(ConnectionState::Open);

    // THEN: The clone reports Open
    assert_eq!(observer.get(), ConnectionState::Open);
    assert!(observer.is_open());
}

/// **VALUE**: Verifies every state survives the atomic round trip.
///
/// **WHY THIS MATTERS**: States are stored as `u8`; a wrong discriminant mapping would turn
/// Closing into Closed and break the close handshake bookkeeping.
///
/// **BUG THIS CATCHES**: Would catch a mismatch between the `repr(u8)` values and `from_u8`.
#[test]
fn given_each_state_when_stored_then_loaded_unchanged() {
    // GIVEN: A status
    let status = ConnectionStatus::default();
    assert_eq!(status.get(), ConnectionState::Connecting);

    // WHEN/THEN: Every state reads back as written
    for state in [
        ConnectionState::Connecting,
        ConnectionState::Open,
        ConnectionState::Closing,
        ConnectionState::Closed,
    ] {
        status.set(state);
        assert_eq!(status.get(), state);
        assert_eq!(status.is_open(), state == ConnectionState::Open);
    }
}

/// **VALUE**: Verifies the Display labels used in `SendOnClosed` messages.
///
/// **WHY THIS MATTERS**: A send failure reads "transport is Connecting"; the label is the
/// only hint the caller gets.
///
/// **BUG THIS CATCHES**: Would catch a Display impl falling back to Debug formatting.
#[test]
fn given_states_when_displayed_then_show_plain_names() {
    assert_eq!(ConnectionState::Connecting.to_string(), "Connecting");
    assert_eq!(ConnectionState::Closed.to_string(), "Closed");
}
