use nxtlink_lcp::LcpError;
use nxtlink_transport::TransportError;

/// Errors surfaced by the session layer.
///
/// With a notification sink attached, steady-state failures are reported
/// as notifications and the methods return `Ok`; these errors reach the
/// caller only in headless use. Calling a lifecycle method from the wrong
/// thread is not an error but a panic — that is a programming defect, not
/// a condition to recover from.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The remote address does not name a known device.
    #[error("unknown device: {0:?}")]
    UnknownDevice(String),

    /// Both connect strategies failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] TransportError),

    /// Connect failed while pairing with the device was still in
    /// progress. The owner should restart device discovery.
    #[error("pairing with the device has not completed")]
    PairingRequired,

    /// A read failed on the established connection.
    #[error("receive failed: {0}")]
    Receive(#[source] LcpError),

    /// A write failed on the established connection.
    #[error("send failed: {0}")]
    Send(#[source] LcpError),

    /// No session is active.
    #[error("not connected")]
    NotConnected,
}

pub type Result<T> = std::result::Result<T, SessionError>;
