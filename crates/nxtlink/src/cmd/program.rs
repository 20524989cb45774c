use clap::{Args, Subcommand};
use nxtlink_lcp::{command as builder, reply, ReplyKind};
use nxtlink_session::Command;

use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{lcp_error, CliResult, SUCCESS};
use crate::output::{print_program_name, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum ProgramCommand {
    /// Start a named program stored on the brick.
    Start(StartArgs),
    /// Stop the running program.
    Stop(StopArgs),
    /// Show the name of the running program.
    Name(NameArgs),
}

#[derive(Args, Debug)]
pub struct StartArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Program file name, e.g. demo.rxe.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct StopArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct NameArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

pub fn run(command: ProgramCommand, format: OutputFormat) -> CliResult<i32> {
    match command {
        ProgramCommand::Start(args) => start(args),
        ProgramCommand::Stop(args) => stop(args),
        ProgramCommand::Name(args) => name(args, format),
    }
}

fn start(args: StartArgs) -> CliResult<i32> {
    // Validate the name against the wire field before going near the radio.
    builder::start_program(&args.name).map_err(|err| lcp_error("invalid program name", err))?;

    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;
    session.submit(Command::StartProgram { name: args.name })?;
    session.close();
    Ok(SUCCESS)
}

fn stop(args: StopArgs) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;
    session.submit(Command::StopProgram)?;
    session.close();
    Ok(SUCCESS)
}

fn name(args: NameArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    session.submit(Command::GetProgramName)?;
    let frame = session.await_reply(ReplyKind::ProgramName, timeout)?;
    let program = reply::program_name(&frame).map_err(|err| lcp_error("bad reply", err))?;

    print_program_name(session.addr(), &program, format);
    session.close();
    Ok(SUCCESS)
}
