/// Errors that can occur during LCP encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum LcpError {
    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,

    /// A program or file name does not fit its fixed-width wire field.
    #[error("name too long ({len} bytes, max {max})")]
    NameTooLong { len: usize, max: usize },

    /// A mailbox message does not fit the brick's mailbox slot.
    #[error("mailbox text too long ({len} bytes, max {max})")]
    TextTooLong { len: usize, max: usize },

    /// A reply frame did not match the layout its opcode promises.
    #[error("malformed {0} reply")]
    MalformedReply(&'static str),
}

pub type Result<T> = std::result::Result<T, LcpError>;
