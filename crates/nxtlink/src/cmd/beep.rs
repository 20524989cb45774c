use std::time::Duration;

use clap::Args;
use nxtlink_session::Command;

use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct BeepArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Tone frequency in Hz (the brick supports 200-14000).
    #[arg(long, default_value_t = 440)]
    pub frequency: u16,

    /// Tone duration in milliseconds.
    #[arg(long, default_value_t = 500)]
    pub duration: u16,
}

pub fn run(args: BeepArgs, _format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::Beep {
        frequency: args.frequency,
        duration_ms: args.duration,
    })?;

    // Let the tone play out before the disconnect stop volley.
    std::thread::sleep(Duration::from_millis(u64::from(args.duration)));
    session.close();
    Ok(SUCCESS)
}
