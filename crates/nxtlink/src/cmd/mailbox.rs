use clap::Args;
use nxtlink_lcp::command as builder;
use nxtlink_session::Command;

use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{lcp_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct MailboxArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Text to deliver.
    pub text: String,

    /// Mailbox number on the brick (0-9).
    #[arg(long = "box", default_value_t = 0)]
    pub mailbox: u8,
}

pub fn run(args: MailboxArgs, _format: OutputFormat) -> CliResult<i32> {
    // Validate the text against the mailbox slot before connecting.
    builder::write_mailbox(args.mailbox, &args.text)
        .map_err(|err| lcp_error("invalid mailbox text", err))?;

    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;
    session.submit(Command::WriteMailbox {
        mailbox: args.mailbox,
        text: args.text,
    })?;
    session.close();
    Ok(SUCCESS)
}
