use std::io::{Read, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::time::Duration;

use tracing::debug;

use crate::addr::BtAddr;
use crate::error::{Result, TransportError};

const BTPROTO_RFCOMM: libc::c_int = 3;
const SOL_BLUETOOTH: libc::c_int = 274;
const BT_SECURITY: libc::c_int = 4;
const BT_SECURITY_MEDIUM: u8 = 2;

/// RFCOMM channel the brick publishes its serial-port service on.
pub const SERIAL_PORT_CHANNEL: u8 = 1;

/// `sockaddr_rc` from `<bluetooth/rfcomm.h>`; not exposed by libc.
#[repr(C)]
struct SockaddrRc {
    rc_family: libc::sa_family_t,
    rc_bdaddr: [u8; 6],
    rc_channel: u8,
}

/// `bt_security` from `<bluetooth/bluetooth.h>`.
#[repr(C)]
struct BtSecurity {
    level: u8,
    key_size: u8,
}

/// A connected RFCOMM socket to a remote Bluetooth device.
pub struct RfcommStream {
    fd: OwnedFd,
    addr: BtAddr,
}

impl RfcommStream {
    /// Connect on `channel` with the link elevated to the standard
    /// security level, as a serial-port service connection requires.
    pub fn connect(addr: BtAddr, channel: u8) -> Result<Self> {
        Self::connect_inner(addr, channel, true)
    }

    /// Connect on `channel` without requesting security elevation.
    ///
    /// Some radio stacks reject the secure allocation for this class of
    /// peripheral; the raw path is the documented workaround.
    pub fn connect_raw(addr: BtAddr, channel: u8) -> Result<Self> {
        Self::connect_inner(addr, channel, false)
    }

    fn connect_inner(addr: BtAddr, channel: u8, secure: bool) -> Result<Self> {
        // SAFETY: plain socket(2) call; the returned descriptor is checked
        // before being handed to OwnedFd.
        let raw = unsafe {
            libc::socket(
                libc::AF_BLUETOOTH,
                libc::SOCK_STREAM | libc::SOCK_CLOEXEC,
                BTPROTO_RFCOMM,
            )
        };
        if raw < 0 {
            return Err(connect_error(addr, std::io::Error::last_os_error()));
        }
        // SAFETY: `raw` is a freshly created socket descriptor owned by
        // this process and not shared with anything else.
        let fd = unsafe { OwnedFd::from_raw_fd(raw) };

        if secure {
            let sec = BtSecurity {
                level: BT_SECURITY_MEDIUM,
                key_size: 0,
            };
            // SAFETY: `sec` is a valid readable pointer for the provided
            // size and `fd` is an open socket descriptor.
            let rc = unsafe {
                libc::setsockopt(
                    fd.as_raw_fd(),
                    SOL_BLUETOOTH,
                    BT_SECURITY,
                    (&sec as *const BtSecurity).cast::<libc::c_void>(),
                    std::mem::size_of::<BtSecurity>() as libc::socklen_t,
                )
            };
            if rc < 0 {
                return Err(connect_error(addr, std::io::Error::last_os_error()));
            }
        }

        let sa = SockaddrRc {
            rc_family: libc::AF_BLUETOOTH as libc::sa_family_t,
            rc_bdaddr: addr.to_bdaddr(),
            rc_channel: channel,
        };
        // SAFETY: `sa` is a valid sockaddr_rc for the provided length.
        let rc = unsafe {
            libc::connect(
                fd.as_raw_fd(),
                (&sa as *const SockaddrRc).cast::<libc::sockaddr>(),
                std::mem::size_of::<SockaddrRc>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(connect_error(addr, std::io::Error::last_os_error()));
        }

        debug!(%addr, channel, secure, "rfcomm connected");
        Ok(Self { fd, addr })
    }

    /// The remote address this stream is connected to.
    pub fn peer_addr(&self) -> BtAddr {
        self.addr
    }

    /// Try to clone this stream (creates a new file descriptor).
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            fd: self.fd.try_clone()?,
            addr: self.addr,
        })
    }

    /// Shut down both directions, unblocking any in-flight read.
    pub fn shutdown(&self) -> Result<()> {
        // SAFETY: `fd` is an open socket descriptor owned by this stream.
        let rc = unsafe { libc::shutdown(self.fd.as_raw_fd(), libc::SHUT_RDWR) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            // Already disconnected counts as shut down.
            if err.raw_os_error() != Some(libc::ENOTCONN) {
                return Err(TransportError::Io(err));
            }
        }
        Ok(())
    }

    /// Set read timeout on the underlying socket.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.set_timeout(libc::SO_RCVTIMEO, timeout)
    }

    /// Set write timeout on the underlying socket.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.set_timeout(libc::SO_SNDTIMEO, timeout)
    }

    fn set_timeout(&self, option: libc::c_int, timeout: Option<Duration>) -> Result<()> {
        let tv = match timeout {
            Some(d) => libc::timeval {
                tv_sec: d.as_secs() as libc::time_t,
                tv_usec: d.subsec_micros() as libc::suseconds_t,
            },
            None => libc::timeval {
                tv_sec: 0,
                tv_usec: 0,
            },
        };
        // SAFETY: `tv` is a valid readable pointer for the provided size
        // and `fd` is an open socket descriptor.
        let rc = unsafe {
            libc::setsockopt(
                self.fd.as_raw_fd(),
                libc::SOL_SOCKET,
                option,
                (&tv as *const libc::timeval).cast::<libc::c_void>(),
                std::mem::size_of::<libc::timeval>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(TransportError::Io(std::io::Error::last_os_error()));
        }
        Ok(())
    }
}

impl Read for RfcommStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        // SAFETY: `buf` is a valid writable buffer for its length and `fd`
        // is an open socket descriptor.
        let n = unsafe {
            libc::read(
                self.fd.as_raw_fd(),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }
}

impl Write for RfcommStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        // SAFETY: `buf` is a valid readable buffer for its length and `fd`
        // is an open socket descriptor.
        let n = unsafe {
            libc::write(
                self.fd.as_raw_fd(),
                buf.as_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if n < 0 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        // Socket writes are unbuffered.
        Ok(())
    }
}

impl std::fmt::Debug for RfcommStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RfcommStream")
            .field("addr", &self.addr)
            .finish()
    }
}

fn connect_error(addr: BtAddr, source: std::io::Error) -> TransportError {
    TransportError::Connect { addr, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sockaddr_layout_matches_kernel_abi() {
        // family (2) + bdaddr (6) + channel (1), padded to 10 by repr(C).
        assert_eq!(std::mem::offset_of!(SockaddrRc, rc_bdaddr), 2);
        assert_eq!(std::mem::offset_of!(SockaddrRc, rc_channel), 8);
    }

    #[test]
    fn connect_to_unreachable_device_fails() {
        // No radio hardware in CI; whatever the stack says, it must come
        // back as a typed connect error, not a panic.
        let addr = BtAddr::new([0x00, 0x16, 0x53, 0x00, 0x00, 0x01]);
        let result = RfcommStream::connect_raw(addr, SERIAL_PORT_CHANNEL);
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }
}
