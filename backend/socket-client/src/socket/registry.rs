//! Handler registry: tag → single handler, for server messages and lifecycle events.
//!
//! Handlers are stored type-erased, but registration is typed through
//! [`ServerVariant`] and [`LifecycleVariant`], so a handler can only be bound to
//! the payload type of its tag. Registering a tag again replaces the previous
//! handler.

use crate::error::SocketError;
use crate::socket::event::{LifecycleEvent, LifecycleTag, LifecycleVariant};

use common::ErrorLocation;

use models::ServerVariant;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

pub(crate) type MessageHandler = Arc<dyn Fn(Value) -> Result<(), SocketError> + Send + Sync>;
pub(crate) type LifecycleHandler = Arc<dyn Fn(LifecycleEvent) + Send + Sync>;

#[derive(Default)]
pub struct HandlerRegistry {
    messages: RwLock<HashMap<&'static str, MessageHandler>>,
    lifecycle: RwLock<HashMap<LifecycleTag, LifecycleHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to server messages tagged `V::TAG`.
    ///
    /// The payload is deserialized into `V::Payload` before the handler runs; a
    /// payload that does not fit is reported as [`SocketError::Decode`], located
    /// at the conversion inside the registry.
    pub fn register<V: ServerVariant>(
        &self,
        handler: impl Fn(V::Payload) + Send + Sync + 'static,
    ) -> &Self {
        let erased: MessageHandler = Arc::new(move |payload: Value| {
            let payload = serde_json::from_value::<V::Payload>(payload).map_err(|e| {
                SocketError::Decode {
                    message: format!("Invalid payload for {}: {e}", V::TAG),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;
            handler(payload);
            Ok(())
        });

        self.messages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(V::TAG, erased);
        self
    }

    /// Binds `handler` to lifecycle events of kind `V::TAG`.
    pub fn register_lifecycle<V: LifecycleVariant>(
        &self,
        handler: impl Fn(V::Payload) + Send + Sync + 'static,
    ) -> &Self {
        let erased: LifecycleHandler = Arc::new(move |event: LifecycleEvent| {
            if let Some(payload) = V::payload(event) {
                handler(payload);
            }
        });

        self.lifecycle
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(V::TAG, erased);
        self
    }

    pub fn has_handler(&self, tag: &str) -> bool {
        self.message_handler(tag).is_some()
    }

    pub fn has_lifecycle_handler(&self, tag: LifecycleTag) -> bool {
        self.lifecycle_handler(tag).is_some()
    }

    // Handlers are cloned out so none runs while the map is locked; a handler may
    // register or replace handlers itself.
    pub(crate) fn message_handler(&self, tag: &str) -> Option<MessageHandler> {
        self.messages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tag)
            .cloned()
    }

    pub(crate) fn lifecycle_handler(&self, tag: LifecycleTag) -> Option<LifecycleHandler> {
        self.lifecycle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag)
            .cloned()
    }
}
