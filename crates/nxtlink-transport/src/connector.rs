use crate::addr::BtAddr;
use crate::error::Result;
use crate::stream::BrickStream;

/// Strategy for establishing a byte stream to a brick.
///
/// The primary path allocates a channel on the well-known serial-port
/// service. Some platform radio stacks reject that allocation for this
/// class of peripheral; [`Connector::connect_fallback`] is the documented
/// workaround — a raw channel allocation with no security elevation.
/// The session layer decides when the fallback is attempted.
pub trait Connector: Send {
    /// Standard secure channel allocation.
    fn connect(&self, addr: BtAddr) -> Result<BrickStream>;

    /// Alternate, vendor-workaround allocation path.
    fn connect_fallback(&self, addr: BtAddr) -> Result<BrickStream>;
}

/// Production connector over RFCOMM.
#[derive(Debug, Default, Clone, Copy)]
pub struct RfcommConnector;

#[cfg(target_os = "linux")]
impl Connector for RfcommConnector {
    fn connect(&self, addr: BtAddr) -> Result<BrickStream> {
        let stream = crate::rfcomm::RfcommStream::connect(addr, crate::rfcomm::SERIAL_PORT_CHANNEL)?;
        Ok(BrickStream::from_rfcomm(stream))
    }

    fn connect_fallback(&self, addr: BtAddr) -> Result<BrickStream> {
        tracing::warn!(%addr, "secure rfcomm connect failed, trying raw channel allocation");
        let stream =
            crate::rfcomm::RfcommStream::connect_raw(addr, crate::rfcomm::SERIAL_PORT_CHANNEL)?;
        Ok(BrickStream::from_rfcomm(stream))
    }
}

#[cfg(not(target_os = "linux"))]
impl Connector for RfcommConnector {
    fn connect(&self, addr: BtAddr) -> Result<BrickStream> {
        Err(unsupported(addr))
    }

    fn connect_fallback(&self, addr: BtAddr) -> Result<BrickStream> {
        Err(unsupported(addr))
    }
}

#[cfg(not(target_os = "linux"))]
fn unsupported(addr: BtAddr) -> crate::error::TransportError {
    crate::error::TransportError::Connect {
        addr,
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "rfcomm transport requires Linux",
        ),
    }
}
