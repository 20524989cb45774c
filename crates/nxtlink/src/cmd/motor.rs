use clap::{Args, ValueEnum};
use nxtlink_lcp::Motor;
use nxtlink_session::Command;

use crate::cmd::{parse_duration, ConnectArgs};
use crate::connect::CliSession;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Port {
    A,
    B,
    C,
}

impl From<Port> for Motor {
    fn from(port: Port) -> Motor {
        match port {
            Port::A => Motor::A,
            Port::B => Motor::B,
            Port::C => Motor::C,
        }
    }
}

#[derive(Args, Debug)]
pub struct MotorArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output port the motor is attached to.
    pub port: Port,

    /// Power, -100 to 100. Negative runs the motor backwards.
    #[arg(long, allow_negative_numbers = true, default_value_t = 75)]
    pub power: i32,

    /// How long to drive before disconnecting (e.g. 2s, 500ms).
    #[arg(long, default_value = "1s")]
    pub hold: String,
}

pub fn run(args: MotorArgs, _format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let hold = parse_duration(&args.hold)?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::SetMotorPower {
        motor: args.port.into(),
        power: args.power,
    })?;

    // The disconnect stop volley brings the motor back to rest.
    std::thread::sleep(hold);
    session.close();
    Ok(SUCCESS)
}

#[derive(Args, Debug)]
pub struct RotateArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output port the motor is attached to.
    pub port: Port,

    /// Target tacho count in degrees.
    #[arg(allow_negative_numbers = true)]
    pub degrees: i32,

    /// How long to allow the movement before disconnecting.
    #[arg(long, default_value = "2s")]
    pub hold: String,
}

pub fn run_rotate(args: RotateArgs, _format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let hold = parse_duration(&args.hold)?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::RotateTo {
        motor: args.port.into(),
        tacho_limit: args.degrees,
    })?;

    std::thread::sleep(hold);
    session.close();
    Ok(SUCCESS)
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output port the motor is attached to.
    pub port: Port,
}

pub fn run_reset(args: ResetArgs, _format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::ResetMotor {
        motor: args.port.into(),
    })?;

    session.close();
    Ok(SUCCESS)
}
