use crate::error::SocketError;
use crate::socket::{Frame, InboundMessage, decode};

use models::ServerMessage;

/// **VALUE**: Verifies a well-formed frame decodes to a single tag.
///
/// **WHY THIS MATTERS**: This is the happy path for every search result.
///
/// **BUG THIS CATCHES**: Would catch the decoder dropping or renaming the top-level key.
#[test]
fn given_search_results_frame_when_decoded_then_single_tag() {
    // GIVEN: A server frame
    let raw = r#"{"SearchResults":["x","y"]}"#;

    // WHEN: Decoding
    let message = decode(raw).expect("decode");

    // THEN: One tag, SearchResults
    assert_eq!(message.tags().collect::<Vec<_>>(), vec!["SearchResults"]);
    assert_eq!(message.len(), 1);
}

/// **VALUE**: Verifies that non-JSON text is a decode failure.
///
/// **WHY THIS MATTERS**: Decode failures are routed to the Error lifecycle handler and the
/// frame is dropped; anything else would dispatch garbage.
///
/// **BUG THIS CATCHES**: Would catch a lenient parser that turns garbage into an empty message.
#[test]
fn given_non_json_text_when_decoded_then_decode_error() {
    // GIVEN: Garbage
    // WHEN: Decoding
    let result = decode("not json");

    // THEN: Decode error
    assert!(matches!(result, Err(SocketError::Decode { .. })));
}

/// **VALUE**: Verifies decoding is permissive about tags.
///
/// **WHY THIS MATTERS**: Unknown tags are diagnosed at dispatch ("no handler"), not here.
///
/// **BUG THIS CATCHES**: Would catch schema validation creeping into the decoder.
#[test]
fn given_unknown_tag_when_decoded_then_accepted() {
    // GIVEN: A tag no handler knows
    let message = decode(r#"{"NowPlaying":{"title":"x"}}"#).expect("decode");

    // THEN: Tag preserved
    assert_eq!(message.tags().collect::<Vec<_>>(), vec!["NowPlaying"]);
}

/// **VALUE**: Verifies multi-key and non-object JSON handling.
///
/// **WHY THIS MATTERS**: Malformed frames with several keys dispatch every key; scalar JSON
/// carries no tag at all.
///
/// **BUG THIS CATCHES**: Would catch the decoder keeping only the first key or rejecting
/// valid JSON that is not an object.
#[test]
fn given_multi_key_and_scalar_frames_when_decoded_then_entries_reflect_keys() {
    // GIVEN/WHEN: A two-key object and a scalar
    let multi = decode(r#"{"SearchResults":[],"Other":1}"#).expect("decode");
    let scalar = decode("42").expect("decode");

    // THEN: Both keys kept; scalar has none
    assert_eq!(multi.len(), 2);
    assert!(scalar.is_empty());
}

/// **VALUE**: Verifies a typed `ServerMessage` converts to the same shape the wire produces.
///
/// **WHY THIS MATTERS**: `Dispatcher::dispatch` accepts typed messages through this conversion.
///
/// **BUG THIS CATCHES**: Would catch a conversion that loses the tag.
#[test]
fn given_server_message_when_converted_then_matches_decoded_frame() {
    // GIVEN: A typed message
    let typed = ServerMessage::SearchResults(vec!["a".to_string()]);

    // WHEN: Converting
    let message = InboundMessage::from(typed);

    // THEN: Same as decoding the wire form
    assert_eq!(message, decode(r#"{"SearchResults":["a"]}"#).unwrap());
}

/// **VALUE**: Verifies text extraction from binary frames.
///
/// **WHY THIS MATTERS**: Some servers send JSON in binary frames; the payload must still be
/// decoded, and non-UTF-8 bytes must fail rather than panic.
///
/// **BUG THIS CATCHES**: Would catch lossy conversion hiding corrupt frames.
#[test]
fn given_binary_frames_when_text_extracted_then_utf8_required() {
    // GIVEN: Valid and invalid UTF-8 payloads
    let valid = Frame::Binary(br#"{"SearchResults":[]}"#.to_vec());
    let invalid = Frame::Binary(vec![0xff, 0xfe]);

    // WHEN/THEN: Valid extracts, invalid is a decode error
    assert_eq!(valid.into_text().unwrap(), r#"{"SearchResults":[]}"#);
    assert!(matches!(invalid.into_text(), Err(SocketError::Decode { .. })));
}
