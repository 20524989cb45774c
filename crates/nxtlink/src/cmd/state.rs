use clap::Args;
use nxtlink_lcp::{OutputState, ReplyKind};
use nxtlink_session::Command;

use crate::cmd::motor::Port;
use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{lcp_error, CliResult, SUCCESS};
use crate::output::{print_output_state, OutputFormat};

#[derive(Args, Debug)]
pub struct StateArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output port the motor is attached to.
    pub port: Port,
}

pub fn run(args: StateArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::ReadOutputState {
        motor: args.port.into(),
    })?;
    let frame = session.await_reply(ReplyKind::OutputState, timeout)?;
    let state = OutputState::parse(&frame).map_err(|err| lcp_error("bad reply", err))?;

    print_output_state(session.addr(), &state, format);
    session.close();
    Ok(SUCCESS)
}
