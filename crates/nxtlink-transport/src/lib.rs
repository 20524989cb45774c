//! Bluetooth transport abstraction for the LEGO NXT brick.
//!
//! Provides a byte-stream over the serial channel the brick listens on:
//! - RFCOMM sockets on Linux (primary secure path plus a raw fallback)
//! - A loopback stream for tests and self-diagnostics
//!
//! This is the lowest layer of nxtlink. Everything else builds on top of
//! the [`BrickStream`] type provided here.

pub mod addr;
pub mod connector;
pub mod error;

#[cfg(target_os = "linux")]
pub mod rfcomm;

pub mod stream;

pub use addr::BtAddr;
pub use connector::{Connector, RfcommConnector};
pub use error::{Result, TransportError};
pub use stream::BrickStream;
