use clap::Args;
use nxtlink_lcp::{FirmwareVersion, ReplyKind};
use nxtlink_session::Command;

use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{lcp_error, CliResult, SUCCESS};
use crate::output::{print_firmware, OutputFormat};

#[derive(Args, Debug)]
pub struct FirmwareArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

pub fn run(args: FirmwareArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::GetFirmwareVersion)?;
    let frame = session.await_reply(ReplyKind::FirmwareVersion, timeout)?;
    let version = FirmwareVersion::parse(&frame).map_err(|err| lcp_error("bad reply", err))?;

    print_firmware(session.addr(), &version, format);
    session.close();
    Ok(SUCCESS)
}
