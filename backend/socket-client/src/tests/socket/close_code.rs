use crate::socket::CloseInfo;
use crate::socket::close_code::{
    ABNORMAL, GOING_AWAY, NORMAL, SERVER_ERROR, SERVICE_RESTART, describe,
};

/// **VALUE**: Verifies the numeric values of the named close codes.
///
/// **WHY THIS MATTERS**: Handlers compare `CloseInfo::code` against these constants to tell
/// a clean shutdown from a crash or a restart. The numbers are fixed by RFC 6455.
///
/// **BUG THIS CATCHES**: Would catch a transposed or mistyped constant.
#[test]
fn given_close_code_constants_when_read_then_match_rfc_values() {
    // GIVEN/WHEN: The named constants
    // THEN: They carry the standard values
    assert_eq!(NORMAL, 1000);
    assert_eq!(GOING_AWAY, 1001);
    assert_eq!(ABNORMAL, 1006);
    assert_eq!(SERVER_ERROR, 1011);
    assert_eq!(SERVICE_RESTART, 1012);
}

/// **VALUE**: Verifies human labels for known and unknown codes.
///
/// **WHY THIS MATTERS**: The CLI prints the label when the connection drops.
///
/// **BUG THIS CATCHES**: Would catch a missing arm that prints a known code as unrecognised.
#[test]
fn given_codes_when_described_then_known_codes_have_labels() {
    // GIVEN/WHEN: Describing codes
    // THEN: Known codes are named, others fall back
    assert_eq!(describe(NORMAL), "normal closure");
    assert_eq!(describe(SERVICE_RESTART), "service restart");
    assert_eq!(describe(4000), "unrecognised close code");
}

/// **VALUE**: Verifies `CloseInfo::abnormal` and `is_normal`.
///
/// **WHY THIS MATTERS**: The transport reports every dropped connection through `abnormal`.
///
/// **BUG THIS CATCHES**: Would catch `abnormal` building a 1000 code, which would make
/// crashes look like clean disconnects.
#[test]
fn given_abnormal_close_when_inspected_then_not_normal() {
    // GIVEN: An abnormal close
    let close = CloseInfo::abnormal("connection lost");

    // WHEN/THEN: Code is 1006 and not normal
    assert_eq!(close.code, ABNORMAL);
    assert_eq!(close.reason, "connection lost");
    assert!(!close.is_normal());
    assert!(CloseInfo::new(NORMAL, "").is_normal());
}
