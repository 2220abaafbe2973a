//! Diagnostic sink injected into the socket wrapper.
//!
//! The handler and dispatcher never log on their own; they report through a
//! [`DiagnosticSink`]. The WebSocket transport task logs through `log` directly.
//! [`LogSink`] forwards to the `log` facade and is the default.

use log::{debug, info, warn};

pub trait DiagnosticSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn debug(&self, message: &str) {
        debug!("{message}");
    }

    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }
}
