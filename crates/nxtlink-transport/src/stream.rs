use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// A connected byte stream to a brick — implements Read + Write.
///
/// This is the fundamental I/O type returned by connect operations.
/// On Linux, this wraps an RFCOMM socket. The loopback variant carries
/// one end of a local socket pair and exists for tests and the CLI
/// self-diagnostics; it speaks the same framing as the real link.
pub struct BrickStream {
    inner: BrickStreamInner,
}

enum BrickStreamInner {
    #[cfg(target_os = "linux")]
    Rfcomm(crate::rfcomm::RfcommStream),
    #[cfg(unix)]
    Loopback(std::os::unix::net::UnixStream),
}

impl Read for BrickStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => stream.read(buf),
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => stream.read(buf),
        }
    }
}

impl Write for BrickStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => stream.write(buf),
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => stream.flush(),
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => stream.flush(),
        }
    }
}

impl BrickStream {
    /// Wrap a connected RFCOMM socket.
    #[cfg(target_os = "linux")]
    pub(crate) fn from_rfcomm(stream: crate::rfcomm::RfcommStream) -> Self {
        Self {
            inner: BrickStreamInner::Rfcomm(stream),
        }
    }

    /// Create a connected pair of loopback streams.
    ///
    /// Bytes written to one end are read from the other. Used by the
    /// session tests and the `doctor` self-test in place of a radio.
    #[cfg(unix)]
    pub fn loopback_pair() -> Result<(Self, Self)> {
        let (left, right) = std::os::unix::net::UnixStream::pair()?;
        Ok((
            Self {
                inner: BrickStreamInner::Loopback(left),
            },
            Self {
                inner: BrickStreamInner::Loopback(right),
            },
        ))
    }

    /// Set read timeout on the underlying stream.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => stream.set_read_timeout(timeout),
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => {
                stream.set_read_timeout(timeout).map_err(Into::into)
            }
        }
    }

    /// Set write timeout on the underlying stream.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => stream.set_write_timeout(timeout),
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => {
                stream.set_write_timeout(timeout).map_err(Into::into)
            }
        }
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        match &self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => {
                let cloned = stream.try_clone()?;
                Ok(Self::from_rfcomm(cloned))
            }
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => {
                let cloned = stream.try_clone()?;
                Ok(Self {
                    inner: BrickStreamInner::Loopback(cloned),
                })
            }
        }
    }

    /// Shut down both directions of the stream.
    ///
    /// Any read blocked on the stream observes an error or EOF on its
    /// next attempt; this is the cooperative-cancellation point.
    pub fn shutdown(&self) -> Result<()> {
        match &self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(stream) => stream.shutdown(),
            #[cfg(unix)]
            BrickStreamInner::Loopback(stream) => {
                match stream.shutdown(std::net::Shutdown::Both) {
                    Ok(()) => Ok(()),
                    // Already disconnected counts as shut down.
                    Err(err) if err.kind() == std::io::ErrorKind::NotConnected => Ok(()),
                    Err(err) => Err(err.into()),
                }
            }
        }
    }
}

impl std::fmt::Debug for BrickStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            #[cfg(target_os = "linux")]
            BrickStreamInner::Rfcomm(_) => f
                .debug_struct("BrickStream")
                .field("type", &"rfcomm")
                .finish(),
            #[cfg(unix)]
            BrickStreamInner::Loopback(_) => f
                .debug_struct("BrickStream")
                .field("type", &"loopback")
                .finish(),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn loopback_roundtrip() {
        let (mut left, mut right) = BrickStream::loopback_pair().unwrap();

        left.write_all(b"hello").unwrap();
        let mut buf = [0u8; 5];
        right.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn clone_shares_the_connection() {
        let (mut left, right) = BrickStream::loopback_pair().unwrap();
        let mut reader = right.try_clone().unwrap();
        drop(right);

        left.write_all(b"xy").unwrap();
        let mut buf = [0u8; 2];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"xy");
    }

    #[test]
    fn shutdown_unblocks_a_pending_read() {
        let (left, mut right) = BrickStream::loopback_pair().unwrap();
        let handle = left.try_clone().unwrap();

        let reader = std::thread::spawn(move || {
            let mut buf = [0u8; 1];
            right.read(&mut buf)
        });

        std::thread::sleep(Duration::from_millis(50));
        handle.shutdown().unwrap();
        drop(left);

        // EOF (Ok(0)) on the peer once both directions are down.
        let result = reader.join().unwrap();
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (left, _right) = BrickStream::loopback_pair().unwrap();
        left.shutdown().unwrap();
        left.shutdown().unwrap();
    }

    #[test]
    fn read_timeout_applies() {
        let (left, _right) = BrickStream::loopback_pair().unwrap();
        left.set_read_timeout(Some(Duration::from_millis(10)))
            .unwrap();

        let mut left = left;
        let mut buf = [0u8; 1];
        let err = left.read(&mut buf).unwrap_err();
        assert!(matches!(
            err.kind(),
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
        ));
    }
}
