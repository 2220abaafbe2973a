//! WebSocket close codes and the payload of a `Disconnect` lifecycle event.
//!
//! The codes are informational. Nothing in the wrapper reacts to them; they
//! exist so handlers can tell a clean shutdown from a crash or a restart.
//!
//! See <https://developer.mozilla.org/en-US/docs/Web/API/CloseEvent/code>.

pub const NORMAL: u16 = 1000;
pub const GOING_AWAY: u16 = 1001;
/// Close frame carried no status code.
pub const NO_STATUS_RECEIVED: u16 = 1005;
pub const ABNORMAL: u16 = 1006;
pub const SERVER_ERROR: u16 = 1011;
pub const SERVICE_RESTART: u16 = 1012;

/// Human readable label for a close code, used in logs and by the CLI.
pub fn describe(code: u16) -> &'static str {
    match code {
        NORMAL => "normal closure",
        GOING_AWAY => "going away",
        NO_STATUS_RECEIVED => "no status received",
        ABNORMAL => "abnormal closure",
        SERVER_ERROR => "server error",
        SERVICE_RESTART => "service restart",
        _ => "unrecognised close code",
    }
}

/// Close code and reason reported when a transport closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseInfo {
    pub code: u16,
    pub reason: String,
}

impl CloseInfo {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Connection dropped without a close handshake.
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self::new(ABNORMAL, reason)
    }

    pub fn is_normal(&self) -> bool {
        self.code == NORMAL
    }
}
