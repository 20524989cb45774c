use clap::Args;
use nxtlink_lcp::{FileEntry, ReplyKind};
use nxtlink_session::Command;

use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{lcp_error, CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_files, OutputFormat};

#[derive(Args, Debug)]
pub struct FilesArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// File name pattern, e.g. *.rxe.
    #[arg(long, default_value = "*.*")]
    pub pattern: String,
}

pub fn run(args: FilesArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    let mut entries: Vec<FileEntry> = Vec::new();
    session.submit(Command::FindFirst {
        pattern: args.pattern,
    })?;

    // The brick answers each FIND with one entry; when the listing is
    // exhausted it replies with a non-zero status, which the engine
    // drops, so the wait simply times out.
    loop {
        match session.await_reply(ReplyKind::FileFound, timeout) {
            Ok(frame) => {
                let entry = FileEntry::parse(&frame).map_err(|err| lcp_error("bad reply", err))?;
                session.submit(Command::FindNext {
                    handle: entry.handle,
                })?;
                entries.push(entry);
            }
            Err(err) if err.code == TIMEOUT => break,
            Err(err) => return Err(err),
        }
    }

    print_files(&entries, format);
    session.close();
    Ok(SUCCESS)
}
