use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use nxtlink_session::Notification;

use crate::cmd::ConnectArgs;
use crate::connect::CliSession;
use crate::exit::{CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{describe_reply, print_event, OutputFormat};

#[derive(Args, Debug)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,
}

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = args.connect.timeout()?;
    let session = CliSession::open(&args.connect.addr, timeout)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .map_err(|err| CliError::new(INTERNAL, format!("signal handler: {err}")))?;
    }

    print_event("connected", Some(session.addr()), format);

    // One line per unresolved send failure, not one per retry; a
    // successful reply clears the latch.
    let mut error_latched = false;
    while running.load(Ordering::SeqCst) {
        match session.next_event(Duration::from_millis(250)) {
            Some(Notification::Reply { frame, .. }) => {
                error_latched = false;
                print_event("reply", Some(&describe_reply(&frame)), format);
            }
            Some(Notification::Advisory(text)) => print_event("advisory", Some(&text), format),
            Some(Notification::SendError) => {
                if !error_latched {
                    error_latched = true;
                    print_event("send-error", None, format);
                }
            }
            Some(Notification::ReceiveError) => {
                print_event("receive-error", None, format);
                break;
            }
            Some(Notification::Connected) => print_event("connected", None, format),
            Some(Notification::ConnectError) => {
                print_event("connect-error", None, format);
                break;
            }
            Some(Notification::PairingRequired) => {
                print_event("pairing-required", None, format);
                break;
            }
            None => {}
        }
    }

    session.close();
    Ok(SUCCESS)
}
