//! Builders for outgoing LCP telegrams.
//!
//! Pure functions: each returns the payload bytes for one command, ready
//! for [`crate::encode_frame`]. String fields are validated against their
//! fixed-width wire fields — truncation is never silent.

use std::fmt;
use std::str::FromStr;

use crate::error::{LcpError, Result};
use crate::opcode;

/// One of the brick's three output ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motor {
    A,
    B,
    C,
}

impl Motor {
    /// All ports, in wire order.
    pub const ALL: [Motor; 3] = [Motor::A, Motor::B, Motor::C];

    /// The port byte as the wire encodes it.
    pub const fn port(self) -> u8 {
        match self {
            Motor::A => 0,
            Motor::B => 1,
            Motor::C => 2,
        }
    }
}

impl fmt::Display for Motor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Motor::A => f.write_str("A"),
            Motor::B => f.write_str("B"),
            Motor::C => f.write_str("C"),
        }
    }
}

impl FromStr for Motor {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Motor::A),
            "B" | "b" => Ok(Motor::B),
            "C" | "c" => Ok(Motor::C),
            other => Err(format!("unknown motor port: {other:?}")),
        }
    }
}

/// Width of the NUL-padded name field in program and file commands
/// (15.3 filename plus terminator).
pub const NAME_FIELD: usize = 20;

/// Longest name that fits [`NAME_FIELD`] with its terminator.
pub const MAX_NAME_LEN: usize = NAME_FIELD - 1;

/// Longest mailbox message the brick accepts (one slot, NUL included).
pub const MAX_MAILBOX_TEXT: usize = 58;

/// Power used for position-bounded rotation.
const ROTATE_POWER: i32 = -80;

// SET_OUTPUT_STATE field values
const MODE_MOTOR_ON: u8 = 0x01;
const MODE_BRAKE: u8 = 0x02;
const REGULATION_MODE_MOTOR_SPEED: u8 = 0x01;
const RUN_STATE_RUNNING: u8 = 0x20;

/// Play a tone. Frequency in Hz (the brick supports 200-14000),
/// duration in milliseconds.
pub fn beep(frequency: u16, duration_ms: u16) -> Vec<u8> {
    vec![
        opcode::DIRECT_COMMAND_NOREPLY,
        opcode::PLAY_TONE,
        frequency as u8,
        (frequency >> 8) as u8,
        duration_ms as u8,
        (duration_ms >> 8) as u8,
    ]
}

/// Trigger a named sound action on the brick's companion program.
pub fn play_action(action: u8) -> Vec<u8> {
    vec![opcode::DIRECT_COMMAND_NOREPLY, opcode::PLAY_ACTION, action]
}

/// Write a text message into one of the brick's mailboxes (0-9).
pub fn write_mailbox(mailbox: u8, text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    if bytes.len() > MAX_MAILBOX_TEXT {
        return Err(LcpError::TextTooLong {
            len: bytes.len(),
            max: MAX_MAILBOX_TEXT,
        });
    }
    let mut message = Vec::with_capacity(bytes.len() + 5);
    message.push(opcode::DIRECT_COMMAND_NOREPLY);
    message.push(opcode::MESSAGE_WRITE);
    message.push(mailbox);
    // Size byte counts the trailing NUL.
    message.push((bytes.len() + 1) as u8);
    message.extend_from_slice(bytes);
    message.push(0);
    Ok(message)
}

/// Start a named program stored on the brick.
pub fn start_program(name: &str) -> Result<Vec<u8>> {
    let field = name_field(name)?;
    let mut message = Vec::with_capacity(2 + NAME_FIELD);
    message.push(opcode::DIRECT_COMMAND_NOREPLY);
    message.push(opcode::START_PROGRAM);
    message.extend_from_slice(&field);
    Ok(message)
}

/// Stop the currently running program.
pub fn stop_program() -> Vec<u8> {
    vec![opcode::DIRECT_COMMAND_NOREPLY, opcode::STOP_PROGRAM]
}

/// Ask for the name of the currently running program. Reply expected.
pub fn get_program_name() -> Vec<u8> {
    vec![
        opcode::DIRECT_COMMAND_REPLY,
        opcode::GET_CURRENT_PROGRAM_NAME,
    ]
}

/// Drive a motor at `power`, clamped to [-100, 100]. Zero power releases
/// the regulation fields entirely, coasting the motor to a stop.
pub fn set_motor_power(motor: Motor, power: i32) -> Vec<u8> {
    let power = power.clamp(-100, 100);
    let mut message = vec![0u8; 12];
    message[0] = opcode::DIRECT_COMMAND_NOREPLY;
    message[1] = opcode::SET_OUTPUT_STATE;
    message[2] = motor.port();
    if power != 0 {
        message[3] = power as i8 as u8;
        message[4] = MODE_MOTOR_ON | MODE_BRAKE;
        message[5] = REGULATION_MODE_MOTOR_SPEED;
        message[6] = 0; // turn ratio
        message[7] = RUN_STATE_RUNNING;
    }
    // Bytes 8-11: tacho limit, zero = run forever.
    message
}

/// Rotate a motor until its tacho counter reaches `tacho_limit`.
pub fn rotate_to(motor: Motor, tacho_limit: i32) -> Vec<u8> {
    let mut message = set_motor_power(motor, ROTATE_POWER);
    message[8..12].copy_from_slice(&tacho_limit.to_le_bytes());
    message
}

/// Reset a motor's position counter.
pub fn reset_motor(motor: Motor) -> Vec<u8> {
    vec![
        opcode::DIRECT_COMMAND_NOREPLY,
        opcode::RESET_MOTOR_POSITION,
        motor.port(),
        0, // absolute counter
    ]
}

/// Read back a motor's output state. Reply expected.
pub fn read_output_state(motor: Motor) -> Vec<u8> {
    vec![
        opcode::DIRECT_COMMAND_REPLY,
        opcode::GET_OUTPUT_STATE,
        motor.port(),
    ]
}

/// Ask for the brick's firmware and protocol versions. Reply expected.
pub fn get_firmware_version() -> Vec<u8> {
    vec![opcode::SYSTEM_COMMAND_REPLY, opcode::GET_FIRMWARE_VERSION]
}

/// Begin a file search matching `pattern` (e.g. `*.*`). Reply expected.
pub fn find_first(pattern: &str) -> Result<Vec<u8>> {
    let field = name_field(pattern)?;
    let mut message = Vec::with_capacity(2 + NAME_FIELD);
    message.push(opcode::SYSTEM_COMMAND_REPLY);
    message.push(opcode::FIND_FIRST);
    message.extend_from_slice(&field);
    Ok(message)
}

/// Continue a file search from the handle a previous reply returned.
/// Reply expected.
pub fn find_next(handle: u8) -> Vec<u8> {
    vec![opcode::SYSTEM_COMMAND_REPLY, opcode::FIND_NEXT, handle]
}

fn name_field(name: &str) -> Result<[u8; NAME_FIELD]> {
    let bytes = name.as_bytes();
    if bytes.len() > MAX_NAME_LEN {
        return Err(LcpError::NameTooLong {
            len: bytes.len(),
            max: MAX_NAME_LEN,
        });
    }
    let mut field = [0u8; NAME_FIELD];
    field[..bytes.len()].copy_from_slice(bytes);
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beep_layout() {
        let message = beep(440, 500);
        assert_eq!(
            message,
            [
                opcode::DIRECT_COMMAND_NOREPLY,
                opcode::PLAY_TONE,
                0xB8,
                0x01,
                0xF4,
                0x01
            ]
        );
    }

    #[test]
    fn motor_power_is_clamped() {
        for (input, expected) in [(250, 100i8), (-250, -100), (55, 55), (-1, -1)] {
            let message = set_motor_power(Motor::A, input);
            assert_eq!(message[3] as i8, expected);
        }
    }

    #[test]
    fn zero_power_coasts() {
        let message = set_motor_power(Motor::B, 0);
        assert_eq!(message[2], 1);
        assert_eq!(&message[3..8], &[0, 0, 0, 0, 0]);
    }

    #[test]
    fn nonzero_power_engages_regulation() {
        let message = set_motor_power(Motor::C, 75);
        assert_eq!(message.len(), 12);
        assert_eq!(message[2], 2);
        assert_eq!(message[3], 75);
        assert_eq!(message[4], MODE_MOTOR_ON | MODE_BRAKE);
        assert_eq!(message[5], REGULATION_MODE_MOTOR_SPEED);
        assert_eq!(message[7], RUN_STATE_RUNNING);
        assert_eq!(&message[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn rotate_to_sets_tacho_limit() {
        let message = rotate_to(Motor::B, 360);
        assert_eq!(message[3] as i8, -80);
        assert_eq!(&message[8..12], &360i32.to_le_bytes());
    }

    #[test]
    fn start_program_pads_name_field() {
        let message = start_program("demo.rxe").unwrap();
        assert_eq!(message.len(), 2 + NAME_FIELD);
        assert_eq!(message[0], opcode::DIRECT_COMMAND_NOREPLY);
        assert_eq!(message[1], opcode::START_PROGRAM);
        assert_eq!(&message[2..10], b"demo.rxe");
        assert!(message[10..].iter().all(|&b| b == 0));
    }

    #[test]
    fn overlong_names_are_rejected() {
        let err = start_program("a-program-name-well-beyond-the-field.rxe").unwrap_err();
        assert!(matches!(err, LcpError::NameTooLong { max: 19, .. }));

        let err = find_first("x".repeat(NAME_FIELD).as_str()).unwrap_err();
        assert!(matches!(err, LcpError::NameTooLong { .. }));
    }

    #[test]
    fn name_at_field_limit_is_accepted() {
        let name = "x".repeat(MAX_NAME_LEN);
        let message = start_program(&name).unwrap();
        assert_eq!(message[2 + MAX_NAME_LEN], 0);
    }

    #[test]
    fn write_mailbox_layout() {
        let message = write_mailbox(0, "go").unwrap();
        assert_eq!(
            message,
            [
                opcode::DIRECT_COMMAND_NOREPLY,
                opcode::MESSAGE_WRITE,
                0,
                3, // "go" plus NUL
                b'g',
                b'o',
                0
            ]
        );
    }

    #[test]
    fn overlong_mailbox_text_is_rejected() {
        let err = write_mailbox(0, &"y".repeat(MAX_MAILBOX_TEXT + 1)).unwrap_err();
        assert!(matches!(err, LcpError::TextTooLong { .. }));
    }

    #[test]
    fn find_files_messages() {
        let first = find_first("*.*").unwrap();
        assert_eq!(first.len(), 22);
        assert_eq!(first[..2], [opcode::SYSTEM_COMMAND_REPLY, opcode::FIND_FIRST]);
        assert_eq!(&first[2..5], b"*.*");

        let next = find_next(7);
        assert_eq!(
            next,
            [opcode::SYSTEM_COMMAND_REPLY, opcode::FIND_NEXT, 7]
        );
    }

    #[test]
    fn query_messages_request_replies() {
        assert_eq!(
            get_firmware_version(),
            [opcode::SYSTEM_COMMAND_REPLY, opcode::GET_FIRMWARE_VERSION]
        );
        assert_eq!(
            get_program_name(),
            [
                opcode::DIRECT_COMMAND_REPLY,
                opcode::GET_CURRENT_PROGRAM_NAME
            ]
        );
        assert_eq!(
            read_output_state(Motor::A),
            [opcode::DIRECT_COMMAND_REPLY, opcode::GET_OUTPUT_STATE, 0]
        );
    }

    #[test]
    fn motor_port_parsing() {
        assert_eq!("a".parse::<Motor>().unwrap(), Motor::A);
        assert_eq!("B".parse::<Motor>().unwrap(), Motor::B);
        assert!("D".parse::<Motor>().is_err());
    }
}
