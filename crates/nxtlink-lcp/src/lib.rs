//! The LEGO communication protocol (LCP) — framing, command builders and
//! reply classification for talking to an NXT brick.
//!
//! Every telegram is framed with a 2-byte little-endian length prefix;
//! no checksum, no escaping. Payload byte 0 carries the command class,
//! byte 1 the opcode, the rest is opcode-specific.
//!
//! This layer is pure: builders produce byte buffers, the classifier maps
//! byte buffers to [`ReplyKind`]s. The blocking [`LcpReader`]/[`LcpWriter`]
//! adapters are the only I/O here.

pub mod codec;
pub mod command;
pub mod error;
pub mod opcode;
pub mod reader;
pub mod reply;
pub mod writer;

pub use codec::{decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
pub use command::Motor;
pub use error::{LcpError, Result};
pub use reader::LcpReader;
pub use reply::{classify, FileEntry, FirmwareVersion, OutputState, ReplyKind};
pub use writer::LcpWriter;
