//! Dispatch: decoded messages and lifecycle events → registered handlers.
//!
//! Handlers run synchronously on the routine that delivers the frame or event.
//! A missing handler is a diagnostic, never an error.

use crate::socket::decoder::{InboundMessage, decode};
use crate::socket::diagnostics::DiagnosticSink;
use crate::socket::event::LifecycleEvent;
use crate::socket::registry::HandlerRegistry;
use crate::socket::transport::Frame;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

pub struct Dispatcher {
    registry: HandlerRegistry,
    last_message: Mutex<Option<SystemTime>>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Dispatcher {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            last_message: Mutex::new(None),
            diagnostics,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub(crate) fn diagnostics(&self) -> &dyn DiagnosticSink {
        self.diagnostics.as_ref()
    }

    /// When the last frame was successfully decoded, `None` before the first one.
    pub fn last_message(&self) -> Option<SystemTime> {
        *self
            .last_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Extracts, decodes and dispatches one inbound frame.
    ///
    /// Extraction and decode failures go to the `Error` lifecycle handler and the
    /// frame is dropped.
    pub fn route_frame(&self, frame: Frame) {
        let decoded = frame.into_text().and_then(|text| decode(&text));

        match decoded {
            Ok(message) => {
                self.dispatch(message);
            }
            Err(error) => {
                self.diagnostics
                    .debug(&format!("Dropping undecodable frame: {error}"));
                self.dispatch_lifecycle(LifecycleEvent::Error(error));
            }
        }
    }

    /// Stamps `last_message`, then invokes the handler of every tag in `message`.
    ///
    /// Returns how many handlers ran. Tags without a handler are reported to the
    /// diagnostic sink. A payload the handler cannot accept is reported through
    /// the `Error` lifecycle handler and counts as not run.
    pub fn dispatch(&self, message: InboundMessage) -> usize {
        self.stamp_last_message();

        if message.is_empty() {
            self.diagnostics.warn("Received message without a type tag");
            return 0;
        }

        let mut invoked = 0;
        for (tag, payload) in message.into_entries() {
            let Some(handler) = self.registry.message_handler(&tag) else {
                self.diagnostics
                    .warn(&format!("No message handler found for message type {tag}"));
                continue;
            };

            match handler(payload) {
                Ok(()) => invoked += 1,
                Err(error) => {
                    self.dispatch_lifecycle(LifecycleEvent::Error(error));
                }
            }
        }
        invoked
    }

    // Each stamp is strictly later than the previous one, even when the clock
    // has not advanced (or went backwards) between two frames.
    fn stamp_last_message(&self) {
        let mut last_message = self
            .last_message
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = SystemTime::now();
        *last_message = Some(match *last_message {
            Some(previous) if now <= previous => previous + Duration::from_nanos(1),
            _ => now,
        });
    }

    /// Invokes the handler registered for `event`'s tag, if any.
    ///
    /// Returns whether a handler ran.
    pub fn dispatch_lifecycle(&self, event: LifecycleEvent) -> bool {
        let tag = event.tag();
        match self.registry.lifecycle_handler(tag) {
            Some(handler) => {
                handler(event);
                true
            }
            None => {
                self.diagnostics
                    .debug(&format!("No lifecycle handler found for {tag:?}"));
                false
            }
        }
    }
}
