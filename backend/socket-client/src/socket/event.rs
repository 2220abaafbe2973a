//! Locally raised lifecycle events and their typed handler markers.
//!
//! Lifecycle events never travel on the wire. The transport raises them and the
//! dispatcher routes each to at most one handler, keyed by [`LifecycleTag`].

use crate::error::SocketError;
use crate::socket::close_code::CloseInfo;

/// Occurrences on the transport that handlers can observe.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    Connect,
    Disconnect(CloseInfo),
    Error(SocketError),
}

impl LifecycleEvent {
    pub fn tag(&self) -> LifecycleTag {
        match self {
            LifecycleEvent::Connect => LifecycleTag::Connect,
            LifecycleEvent::Disconnect(_) => LifecycleTag::Disconnect,
            LifecycleEvent::Error(_) => LifecycleTag::Error,
        }
    }
}

/// Key of the lifecycle handler mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleTag {
    Connect,
    Disconnect,
    Error,
}

/// A single [`LifecycleEvent`] variant, known at compile time.
pub trait LifecycleVariant: 'static {
    const TAG: LifecycleTag;
    type Payload;

    /// Moves the payload out of `event`, or `None` if `event` is another variant.
    fn payload(event: LifecycleEvent) -> Option<Self::Payload>;
}

/// Marker for [`LifecycleEvent::Connect`]. Handlers receive `()`.
#[derive(Debug, Clone, Copy)]
pub struct OnConnect;

/// Marker for [`LifecycleEvent::Disconnect`]. Handlers receive the [`CloseInfo`].
#[derive(Debug, Clone, Copy)]
pub struct OnDisconnect;

/// Marker for [`LifecycleEvent::Error`]. Handlers receive the [`SocketError`].
#[derive(Debug, Clone, Copy)]
pub struct OnError;

impl LifecycleVariant for OnConnect {
    const TAG: LifecycleTag = LifecycleTag::Connect;
    type Payload = ();

    fn payload(event: LifecycleEvent) -> Option<Self::Payload> {
        match event {
            LifecycleEvent::Connect => Some(()),
            _ => None,
        }
    }
}

impl LifecycleVariant for OnDisconnect {
    const TAG: LifecycleTag = LifecycleTag::Disconnect;
    type Payload = CloseInfo;

    fn payload(event: LifecycleEvent) -> Option<Self::Payload> {
        match event {
            LifecycleEvent::Disconnect(close) => Some(close),
            _ => None,
        }
    }
}

impl LifecycleVariant for OnError {
    const TAG: LifecycleTag = LifecycleTag::Error;
    type Payload = SocketError;

    fn payload(event: LifecycleEvent) -> Option<Self::Payload> {
        match event {
            LifecycleEvent::Error(error) => Some(error),
            _ => None,
        }
    }
}
