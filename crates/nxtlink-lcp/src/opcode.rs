//! LCP command classes and opcodes.
//!
//! Telegram byte 0 is the command class, byte 1 the opcode. Replies echo
//! the opcode of the command they answer.

/// Direct command, reply requested.
pub const DIRECT_COMMAND_REPLY: u8 = 0x00;

/// System command, reply requested.
pub const SYSTEM_COMMAND_REPLY: u8 = 0x01;

/// Reply telegram from the brick.
pub const REPLY_COMMAND: u8 = 0x02;

/// Direct command, no reply wanted. Brick-initiated notifications
/// (say-text, vibrate) also arrive under this class.
pub const DIRECT_COMMAND_NOREPLY: u8 = 0x80;

/// System command, no reply wanted.
pub const SYSTEM_COMMAND_NOREPLY: u8 = 0x81;

// Direct commands
pub const START_PROGRAM: u8 = 0x00;
pub const STOP_PROGRAM: u8 = 0x01;
pub const PLAY_TONE: u8 = 0x03;
pub const SET_OUTPUT_STATE: u8 = 0x04;
pub const GET_OUTPUT_STATE: u8 = 0x06;
pub const MESSAGE_WRITE: u8 = 0x09;
pub const RESET_MOTOR_POSITION: u8 = 0x0A;
pub const GET_CURRENT_PROGRAM_NAME: u8 = 0x11;

// System commands
pub const FIND_FIRST: u8 = 0x86;
pub const FIND_NEXT: u8 = 0x87;
pub const GET_FIRMWARE_VERSION: u8 = 0x88;

// leJOS extensions, used by on-brick companion programs
pub const SAY_TEXT: u8 = 0x30;
pub const VIBRATE: u8 = 0x31;
pub const PLAY_ACTION: u8 = 0x32;

/// Returns a human-readable name for an opcode, for diagnostics.
pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        START_PROGRAM => "START_PROGRAM",
        STOP_PROGRAM => "STOP_PROGRAM",
        PLAY_TONE => "PLAY_TONE",
        SET_OUTPUT_STATE => "SET_OUTPUT_STATE",
        GET_OUTPUT_STATE => "GET_OUTPUT_STATE",
        MESSAGE_WRITE => "MESSAGE_WRITE",
        RESET_MOTOR_POSITION => "RESET_MOTOR_POSITION",
        GET_CURRENT_PROGRAM_NAME => "GET_CURRENT_PROGRAM_NAME",
        FIND_FIRST => "FIND_FIRST",
        FIND_NEXT => "FIND_NEXT",
        GET_FIRMWARE_VERSION => "GET_FIRMWARE_VERSION",
        SAY_TEXT => "SAY_TEXT",
        VIBRATE => "VIBRATE",
        PLAY_ACTION => "PLAY_ACTION",
        _ => "UNKNOWN",
    }
}
