use crate::addr::BtAddr;

/// Errors that can occur in brick transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The device address string does not name a Bluetooth device.
    #[error("invalid bluetooth address: {0:?}")]
    InvalidAddress(String),

    /// Failed to connect to the remote device.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: BtAddr,
        source: std::io::Error,
    },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport has been closed.
    #[error("transport closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
