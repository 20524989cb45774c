use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use nxtlink_lcp::command as builder;
use nxtlink_lcp::{LcpError, LcpWriter, Motor};
use nxtlink_transport::BrickStream;
use tracing::{debug, warn};

use crate::command::Command;
use crate::notification::{Notification, NotificationSender};
use crate::session::SessionConfig;

/// How often the loop re-checks the closing flag while idle. Clones of
/// the command sender may outlive the session, so a plain blocking
/// `recv` could pin the teardown forever.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// State handed to the command dispatch thread.
pub(crate) struct DispatchContext {
    pub writer: LcpWriter<BrickStream>,
    pub rx: mpsc::Receiver<Command>,
    pub connected: Arc<AtomicBool>,
    pub closing: Arc<AtomicBool>,
    pub sink: Option<NotificationSender>,
    pub config: SessionConfig,
}

/// Execute commands in enqueue order until the channel closes, a
/// disconnect is processed, or the session starts tearing down.
///
/// This thread is the only writer on the transport; marshalling every
/// submission through it is what keeps the socket lock-free.
pub(crate) fn run(mut ctx: DispatchContext) {
    loop {
        match ctx.rx.recv_timeout(POLL_INTERVAL) {
            Ok(command) => {
                let disconnect = matches!(command, Command::Disconnect);
                execute(&mut ctx, command);
                if disconnect {
                    return;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if ctx.closing.load(Ordering::SeqCst) {
                    // Deliver what was queued ahead of the teardown.
                    while let Ok(command) = ctx.rx.try_recv() {
                        let disconnect = matches!(command, Command::Disconnect);
                        execute(&mut ctx, command);
                        if disconnect {
                            return;
                        }
                    }
                    return;
                }
            }
            Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

fn execute(ctx: &mut DispatchContext, command: Command) {
    match command {
        Command::Disconnect => {
            // Never leave actuators powered when tearing the link down.
            for motor in Motor::ALL {
                send(ctx, Ok(builder::set_motor_power(motor, 0)));
            }
            std::thread::sleep(ctx.config.disconnect_settle);
            ctx.connected.store(false, Ordering::SeqCst);
            if let Err(err) = ctx.writer.get_ref().shutdown() {
                debug!(%err, "shutdown on disconnect");
            }
        }
        Command::Beep {
            frequency,
            duration_ms,
        } => {
            send(ctx, Ok(builder::beep(frequency, duration_ms)));
            std::thread::sleep(ctx.config.beep_pacing);
        }
        other => send(ctx, encode(&other)),
    }
}

fn encode(command: &Command) -> Result<Vec<u8>, LcpError> {
    match command {
        Command::SetMotorPower { motor, power } => Ok(builder::set_motor_power(*motor, *power)),
        Command::RotateTo { motor, tacho_limit } => Ok(builder::rotate_to(*motor, *tacho_limit)),
        Command::ResetMotor { motor } => Ok(builder::reset_motor(*motor)),
        Command::PlayAction { action } => Ok(builder::play_action(*action)),
        Command::WriteMailbox { mailbox, text } => builder::write_mailbox(*mailbox, text),
        Command::StartProgram { name } => builder::start_program(name),
        Command::StopProgram => Ok(builder::stop_program()),
        Command::GetProgramName => Ok(builder::get_program_name()),
        Command::ReadOutputState { motor } => Ok(builder::read_output_state(*motor)),
        Command::GetFirmwareVersion => Ok(builder::get_firmware_version()),
        Command::FindFirst { pattern } => builder::find_first(pattern),
        Command::FindNext { handle } => Ok(builder::find_next(*handle)),
        // Handled before encoding.
        Command::Beep { .. } | Command::Disconnect => unreachable!("handled in execute"),
    }
}

/// Write one telegram; failures become send-error notifications because
/// the submitting thread is gone by the time they happen.
fn send(ctx: &mut DispatchContext, payload: Result<Vec<u8>, LcpError>) {
    let payload = match payload {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%err, "command rejected before encoding");
            notify_send_error(ctx);
            return;
        }
    };
    if let Err(err) = ctx.writer.send(&payload) {
        warn!(%err, "send failed");
        notify_send_error(ctx);
    }
}

fn notify_send_error(ctx: &DispatchContext) {
    if let Some(sink) = &ctx.sink {
        let _ = sink.send(Notification::SendError);
    }
}
