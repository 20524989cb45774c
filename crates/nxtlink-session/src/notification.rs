use bytes::Bytes;
use nxtlink_lcp::ReplyKind;

/// An asynchronous event delivered from the engine to the owner.
///
/// Notifications are ordered and never coalesced; the owner is expected
/// to latch repeated error states itself (one dialog per unresolved
/// failure, acknowledged before the next).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Free-form advisory text for the user.
    Advisory(String),
    /// The session is up and the I/O worker is running.
    Connected,
    /// Both connect strategies failed.
    ConnectError,
    /// Connect failed because pairing has not completed; the owner
    /// should restart device discovery.
    PairingRequired,
    /// A read failed on the established connection; the session is gone.
    ReceiveError,
    /// A command could not be written; the session may still be alive.
    SendError,
    /// A classified reply arrived. `frame` carries the raw telegram for
    /// the owner to decode; it is also retained as the last reply.
    Reply { kind: ReplyKind, frame: Bytes },
}

/// Sink half of the notification channel, supplied by the owner.
pub type NotificationSender = std::sync::mpsc::Sender<Notification>;
