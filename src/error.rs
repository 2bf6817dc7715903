//! Session-layer error taxonomy.
//!
//! All variants carry only fixed-size data; no condition here is fatal to
//! the control loop. Codes surface through local logs and the on-display
//! connectivity badge only.

use core::fmt;

/// Failure reported by the messaging session capability.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// TCP/socket failure beneath the session.
    Network,
    /// The broker refused the connection; carries the raw reason code.
    Refused(u8),
    /// Keepalive or inbound servicing found the connection dead.
    Closed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Network => write!(f, "network error below session"),
            SessionError::Refused(code) => write!(f, "broker refused (code {})", code),
            SessionError::Closed => write!(f, "session closed"),
        }
    }
}
