use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod beep;
pub mod doctor;
pub mod files;
pub mod firmware;
pub mod mailbox;
pub mod monitor;
pub mod motor;
pub mod program;
pub mod state;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a tone on the brick.
    Beep(beep::BeepArgs),
    /// Drive a motor.
    Motor(motor::MotorArgs),
    /// Rotate a motor to a position.
    Rotate(motor::RotateArgs),
    /// Reset a motor's position counter.
    Reset(motor::ResetArgs),
    /// Read a motor's output state.
    State(state::StateArgs),
    /// Query the brick's firmware and protocol versions.
    Firmware(firmware::FirmwareArgs),
    /// Start, stop or query on-brick programs.
    #[command(subcommand)]
    Program(program::ProgramCommand),
    /// Write a text message into a brick mailbox.
    Mailbox(mailbox::MailboxArgs),
    /// List files stored on the brick.
    Files(files::FilesArgs),
    /// Stream notifications until interrupted.
    Monitor(monitor::MonitorArgs),
    /// Run the hardware-free engine self-test.
    Doctor(doctor::DoctorArgs),
    /// Show version information.
    Version(version::VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Beep(args) => beep::run(args, format),
        Command::Motor(args) => motor::run(args, format),
        Command::Rotate(args) => motor::run_rotate(args, format),
        Command::Reset(args) => motor::run_reset(args, format),
        Command::State(args) => state::run(args, format),
        Command::Firmware(args) => firmware::run(args, format),
        Command::Program(command) => program::run(command, format),
        Command::Mailbox(args) => mailbox::run(args, format),
        Command::Files(args) => files::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

/// Connection options shared by every hardware command.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Bluetooth address of the brick, e.g. 00:16:53:01:02:03.
    #[arg(short, long, env = "NXT_ADDR")]
    pub addr: String,

    /// Time to wait for the connection and for replies (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

impl ConnectArgs {
    pub fn timeout(&self) -> CliResult<Duration> {
        parse_duration(&self.timeout)
    }
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }
}
