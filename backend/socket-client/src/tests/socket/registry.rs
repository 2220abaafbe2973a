use crate::socket::{HandlerRegistry, LifecycleTag, OnConnect, OnError};

use models::SearchResults;

/// **VALUE**: Verifies registration is chainable and recorded per tag.
///
/// **WHY THIS MATTERS**: Callers bind all handlers in one expression right after construction.
///
/// **BUG THIS CATCHES**: Would catch `register` storing under the wrong key or returning a
/// fresh registry.
#[test]
fn given_chained_registrations_when_queried_then_each_tag_has_handler() {
    // GIVEN: An empty registry
    let registry = HandlerRegistry::new();
    assert!(!registry.has_handler("SearchResults"));

    // WHEN: Chaining registrations
    registry
        .register::<SearchResults>(|_| {})
        .register_lifecycle::<OnConnect>(|()| {});

    // THEN: Both mappings hold their handler, others stay empty
    assert!(registry.has_handler("SearchResults"));
    assert!(registry.has_lifecycle_handler(LifecycleTag::Connect));
    assert!(!registry.has_lifecycle_handler(LifecycleTag::Error));
    assert!(!registry.has_handler("Search"));
}

/// **VALUE**: Verifies the two mappings are independent.
///
/// **WHY THIS MATTERS**: A lifecycle tag must never satisfy a server-message lookup.
///
/// **BUG THIS CATCHES**: Would catch both kinds sharing one map keyed by string.
#[test]
fn given_lifecycle_handler_when_message_lookup_then_not_found() {
    // GIVEN: Only an Error lifecycle handler
    let registry = HandlerRegistry::new();
    registry.register_lifecycle::<OnError>(|_| {});

    // WHEN/THEN: No server-message handler under "Error"
    assert!(!registry.has_handler("Error"));
    assert!(registry.has_lifecycle_handler(LifecycleTag::Error));
}
