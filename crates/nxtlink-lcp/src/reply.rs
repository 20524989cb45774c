//! Classification and decoding of telegrams received from the brick.

use std::fmt;

use crate::error::{LcpError, Result};
use crate::opcode;

/// Reply family of a classified telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// GET_OUTPUT_STATE reply carrying motor telemetry.
    OutputState,
    /// GET_FIRMWARE_VERSION reply.
    FirmwareVersion,
    /// FIND_FIRST/FIND_NEXT reply carrying one directory entry.
    FileFound,
    /// GET_CURRENT_PROGRAM_NAME reply.
    ProgramName,
    /// Brick-initiated say-text request.
    SayText,
    /// Brick-initiated vibrate request.
    Vibrate,
}

/// Classify an incoming telegram.
///
/// Total over arbitrary byte sequences. Returns `None` for anything that
/// is not a well-formed reply of a known family: too short, wrong leading
/// marker, unknown opcode, or a frame failing its family's length/status
/// gate. Short or garbled replies are dropped without notification; they
/// are not an error.
pub fn classify(frame: &[u8]) -> Option<ReplyKind> {
    if frame.len() < 2 {
        return None;
    }
    if frame[0] != opcode::REPLY_COMMAND && frame[0] != opcode::DIRECT_COMMAND_NOREPLY {
        return None;
    }
    match frame[1] {
        opcode::GET_OUTPUT_STATE if frame.len() >= 25 => Some(ReplyKind::OutputState),
        opcode::GET_FIRMWARE_VERSION if frame.len() >= 7 => Some(ReplyKind::FirmwareVersion),
        opcode::FIND_FIRST | opcode::FIND_NEXT if frame.len() >= 28 && frame[2] == 0 => {
            Some(ReplyKind::FileFound)
        }
        opcode::GET_CURRENT_PROGRAM_NAME if frame.len() >= 23 => Some(ReplyKind::ProgramName),
        opcode::SAY_TEXT if frame.len() == 22 => Some(ReplyKind::SayText),
        opcode::VIBRATE if frame.len() == 3 => Some(ReplyKind::Vibrate),
        _ => None,
    }
}

/// Decoded GET_FIRMWARE_VERSION reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareVersion {
    pub protocol_major: u8,
    pub protocol_minor: u8,
    pub firmware_major: u8,
    pub firmware_minor: u8,
}

impl FirmwareVersion {
    /// Decode from a classified firmware-version reply.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if classify(frame) != Some(ReplyKind::FirmwareVersion) {
            return Err(LcpError::MalformedReply("firmware version"));
        }
        Ok(Self {
            protocol_minor: frame[3],
            protocol_major: frame[4],
            firmware_minor: frame[5],
            firmware_major: frame[6],
        })
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "firmware {}.{:02}, protocol {}.{}",
            self.firmware_major, self.firmware_minor, self.protocol_major, self.protocol_minor
        )
    }
}

/// Decoded GET_OUTPUT_STATE reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputState {
    pub status: u8,
    pub port: u8,
    pub power: i8,
    pub mode: u8,
    pub regulation: u8,
    pub turn_ratio: i8,
    pub run_state: u8,
    /// Current limit on a movement, 0 = run forever.
    pub tacho_limit: u32,
    /// Count since the last reset of the motor counter.
    pub tacho_count: i32,
    /// Current position relative to the last programmed movement.
    pub block_tacho_count: i32,
    /// Current position relative to the last reset of the rotation sensor.
    pub rotation_count: i32,
}

impl OutputState {
    /// Decode from a classified output-state reply.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if classify(frame) != Some(ReplyKind::OutputState) {
            return Err(LcpError::MalformedReply("output state"));
        }
        Ok(Self {
            status: frame[2],
            port: frame[3],
            power: frame[4] as i8,
            mode: frame[5],
            regulation: frame[6],
            turn_ratio: frame[7] as i8,
            run_state: frame[8],
            tacho_limit: u32::from_le_bytes(frame[9..13].try_into().unwrap()),
            tacho_count: i32::from_le_bytes(frame[13..17].try_into().unwrap()),
            block_tacho_count: i32::from_le_bytes(frame[17..21].try_into().unwrap()),
            rotation_count: i32::from_le_bytes(frame[21..25].try_into().unwrap()),
        })
    }
}

/// One directory entry from a FIND_FIRST/FIND_NEXT reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Search handle to pass to the next FIND_NEXT.
    pub handle: u8,
    pub name: String,
    pub size: u32,
}

impl FileEntry {
    /// Decode from a classified file-search reply.
    pub fn parse(frame: &[u8]) -> Result<Self> {
        if classify(frame) != Some(ReplyKind::FileFound) {
            return Err(LcpError::MalformedReply("file search"));
        }
        Ok(Self {
            handle: frame[3],
            name: field_string(&frame[4..24]),
            size: u32::from_le_bytes(frame[24..28].try_into().unwrap()),
        })
    }
}

/// Decode the program name from a classified program-name reply.
pub fn program_name(frame: &[u8]) -> Result<String> {
    if classify(frame) != Some(ReplyKind::ProgramName) {
        return Err(LcpError::MalformedReply("program name"));
    }
    Ok(field_string(&frame[3..23]))
}

/// Text up to the first NUL of a fixed-width name field.
fn field_string(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(opcode: u8, len: usize) -> Vec<u8> {
        let mut frame = vec![0u8; len];
        frame[0] = crate::opcode::REPLY_COMMAND;
        frame[1] = opcode;
        frame
    }

    #[test]
    fn classify_is_total_over_garbage() {
        assert_eq!(classify(&[]), None);
        assert_eq!(classify(&[0x02]), None);
        assert_eq!(classify(&[0xFF; 30]), None);
        // Valid opcode under a non-reply marker.
        let mut frame = reply(opcode::GET_FIRMWARE_VERSION, 7);
        frame[0] = opcode::DIRECT_COMMAND_REPLY;
        assert_eq!(classify(&frame), None);
    }

    #[test]
    fn classify_accepts_both_reply_markers() {
        let mut frame = reply(opcode::VIBRATE, 3);
        assert_eq!(classify(&frame), Some(ReplyKind::Vibrate));
        frame[0] = opcode::DIRECT_COMMAND_NOREPLY;
        assert_eq!(classify(&frame), Some(ReplyKind::Vibrate));
    }

    #[test]
    fn length_gates_per_family() {
        assert_eq!(
            classify(&reply(opcode::GET_OUTPUT_STATE, 25)),
            Some(ReplyKind::OutputState)
        );
        assert_eq!(classify(&reply(opcode::GET_OUTPUT_STATE, 24)), None);

        assert_eq!(
            classify(&reply(opcode::GET_FIRMWARE_VERSION, 7)),
            Some(ReplyKind::FirmwareVersion)
        );
        assert_eq!(classify(&reply(opcode::GET_FIRMWARE_VERSION, 6)), None);

        assert_eq!(
            classify(&reply(opcode::GET_CURRENT_PROGRAM_NAME, 23)),
            Some(ReplyKind::ProgramName)
        );
        assert_eq!(classify(&reply(opcode::GET_CURRENT_PROGRAM_NAME, 22)), None);
    }

    #[test]
    fn say_text_and_vibrate_gates_are_exact() {
        assert_eq!(
            classify(&reply(opcode::SAY_TEXT, 22)),
            Some(ReplyKind::SayText)
        );
        assert_eq!(classify(&reply(opcode::SAY_TEXT, 21)), None);
        assert_eq!(classify(&reply(opcode::SAY_TEXT, 23)), None);

        assert_eq!(
            classify(&reply(opcode::VIBRATE, 3)),
            Some(ReplyKind::Vibrate)
        );
        assert_eq!(classify(&reply(opcode::VIBRATE, 4)), None);
    }

    #[test]
    fn file_search_requires_zero_status() {
        let ok = reply(opcode::FIND_FIRST, 28);
        assert_eq!(classify(&ok), Some(ReplyKind::FileFound));

        let mut failed = reply(opcode::FIND_FIRST, 28);
        failed[2] = 0x87; // file not found
        assert_eq!(classify(&failed), None);

        let next = reply(opcode::FIND_NEXT, 28);
        assert_eq!(classify(&next), Some(ReplyKind::FileFound));

        assert_eq!(classify(&reply(opcode::FIND_FIRST, 27)), None);
    }

    #[test]
    fn firmware_version_decodes() {
        let mut frame = reply(opcode::GET_FIRMWARE_VERSION, 7);
        frame[3] = 124;
        frame[4] = 1;
        frame[5] = 31;
        frame[6] = 1;

        let version = FirmwareVersion::parse(&frame).unwrap();
        assert_eq!(
            version,
            FirmwareVersion {
                protocol_major: 1,
                protocol_minor: 124,
                firmware_major: 1,
                firmware_minor: 31,
            }
        );
        assert_eq!(version.to_string(), "firmware 1.31, protocol 1.124");
    }

    #[test]
    fn output_state_decodes() {
        let mut frame = reply(opcode::GET_OUTPUT_STATE, 25);
        frame[3] = 1; // port B
        frame[4] = (-80i8) as u8;
        frame[5] = 0x03;
        frame[6] = 0x01;
        frame[8] = 0x20;
        frame[9..13].copy_from_slice(&360u32.to_le_bytes());
        frame[13..17].copy_from_slice(&(-45i32).to_le_bytes());
        frame[21..25].copy_from_slice(&720i32.to_le_bytes());

        let state = OutputState::parse(&frame).unwrap();
        assert_eq!(state.port, 1);
        assert_eq!(state.power, -80);
        assert_eq!(state.tacho_limit, 360);
        assert_eq!(state.tacho_count, -45);
        assert_eq!(state.rotation_count, 720);
    }

    #[test]
    fn program_name_decodes_and_trims_padding() {
        let mut frame = reply(opcode::GET_CURRENT_PROGRAM_NAME, 23);
        frame[3..11].copy_from_slice(b"demo.rxe");

        assert_eq!(program_name(&frame).unwrap(), "demo.rxe");
    }

    #[test]
    fn file_entry_decodes() {
        let mut frame = reply(opcode::FIND_FIRST, 28);
        frame[3] = 2;
        frame[4..13].copy_from_slice(b"sound.rso");
        frame[24..28].copy_from_slice(&1042u32.to_le_bytes());

        let entry = FileEntry::parse(&frame).unwrap();
        assert_eq!(entry.handle, 2);
        assert_eq!(entry.name, "sound.rso");
        assert_eq!(entry.size, 1042);
    }

    #[test]
    fn decoders_reject_unclassified_frames() {
        assert!(FirmwareVersion::parse(&[0x02, 0x88]).is_err());
        assert!(OutputState::parse(&reply(opcode::GET_OUTPUT_STATE, 10)).is_err());
        assert!(program_name(&[]).is_err());
        let mut failed = reply(opcode::FIND_FIRST, 28);
        failed[2] = 1;
        assert!(FileEntry::parse(&failed).is_err());
    }
}
