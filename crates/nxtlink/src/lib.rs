//! Drive a LEGO NXT brick over Bluetooth with the LEGO communication
//! protocol (LCP).
//!
//! nxtlink provides the communication engine: connection establishment
//! with a vendor-specific fallback, length-prefixed framing, a background
//! I/O worker turning raw telegrams into typed notifications, and a
//! thread-safe command channel.
//!
//! # Crate Structure
//!
//! - [`transport`] — Bluetooth RFCOMM byte streams and connect strategies
//! - [`lcp`] — Protocol framing, command builders, reply classification
//! - [`session`] — Session lifecycle and the command/notification channel

/// Re-export transport types.
pub mod transport {
    pub use nxtlink_transport::*;
}

/// Re-export protocol types.
pub mod lcp {
    pub use nxtlink_lcp::*;
}

/// Re-export session types.
pub mod session {
    pub use nxtlink_session::*;
}
