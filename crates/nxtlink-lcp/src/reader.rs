use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use nxtlink_transport::BrickStream;
use tracing::trace;

use crate::codec::{decode_frame, Frame, FrameConfig};
use crate::error::{LcpError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 256;
const READ_CHUNK_SIZE: usize = 256;

/// Reads complete LCP frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete frames.
pub struct LcpReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> LcpReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(LcpError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_payload_size)? {
                trace!(len = frame.payload.len(), "frame received");
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(LcpError::Io(err)),
            };

            if read == 0 {
                return Err(LcpError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl LcpReader<BrickStream> {
    /// Create a frame reader for a `BrickStream` and apply the read
    /// timeout from config.
    pub fn with_config_stream(inner: BrickStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_lcp_error)?;
        Ok(Self::with_config(inner, config))
    }
}

pub(crate) fn transport_to_lcp_error(err: nxtlink_transport::TransportError) -> LcpError {
    match err {
        nxtlink_transport::TransportError::Io(io) => LcpError::Io(io),
        nxtlink_transport::TransportError::Connect { source, .. } => LcpError::Io(source),
        other => LcpError::Io(std::io::Error::other(other.to_string())),
    }
}
