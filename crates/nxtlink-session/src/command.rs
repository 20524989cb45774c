use std::sync::mpsc;

use nxtlink_lcp::Motor;
use tracing::warn;

/// An instruction submitted by the owner for execution against the
/// active session. Immutable once enqueued; executed in enqueue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Drive a motor at the given power, clamped to [-100, 100].
    SetMotorPower { motor: Motor, power: i32 },
    /// Rotate a motor until its counter reaches the limit.
    RotateTo { motor: Motor, tacho_limit: i32 },
    /// Reset a motor's position counter.
    ResetMotor { motor: Motor },
    Beep { frequency: u16, duration_ms: u16 },
    /// Trigger a named sound action on the brick's companion program.
    PlayAction { action: u8 },
    WriteMailbox { mailbox: u8, text: String },
    StartProgram { name: String },
    StopProgram,
    GetProgramName,
    ReadOutputState { motor: Motor },
    GetFirmwareVersion,
    /// Begin a file search matching the pattern.
    FindFirst { pattern: String },
    /// Continue a file search from a previously returned handle.
    FindNext { handle: u8 },
    /// Stop all motors, wait the settle delay, then close the link.
    /// Commands queued ahead of this one still hit the wire first.
    Disconnect,
}

/// Clonable handle for submitting commands from any thread.
///
/// Submission is fire-and-forget: the submitter cannot receive a return
/// value, so write failures surface as send-error notifications from the
/// dispatch thread, never here.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<Command>,
}

impl CommandSender {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    /// Enqueue a command for the dispatch thread.
    pub fn submit(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("command dropped, session is closed");
        }
    }
}
