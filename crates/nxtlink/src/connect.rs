use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use nxtlink_lcp::ReplyKind;
use nxtlink_session::{Command, Notification, PairingFlag, SessionManager};
use tracing::{debug, info};

use crate::exit::{session_error, CliError, CliResult, FAILURE, PAIRING_REQUIRED, TIMEOUT};

/// A connected CLI session: the manager plus its notification stream.
///
/// The CLI is the owner: it lives on the main thread, consumes the
/// notifications, and tears the session down when the command finishes.
pub struct CliSession {
    manager: SessionManager,
    rx: Receiver<Notification>,
    addr: String,
    // The session only holds the pairing capability weakly.
    _owner: Arc<PairingFlag>,
}

impl CliSession {
    /// Connect to the brick at `addr`, waiting up to `timeout` for the
    /// connected notification.
    pub fn open(addr: &str, timeout: Duration) -> CliResult<Self> {
        let (tx, rx) = std::sync::mpsc::channel();
        let owner = PairingFlag::new(false);
        let mut manager = SessionManager::new();
        manager.acquire(owner.clone(), Some(tx), addr);
        manager
            .start()
            .map_err(|err| session_error("connect failed", err))?;

        let deadline = Instant::now() + timeout;
        loop {
            match recv_deadline(&rx, deadline)? {
                Notification::Connected => break,
                Notification::Advisory(text) => info!("{text}"),
                Notification::ConnectError => {
                    return Err(CliError::new(
                        FAILURE,
                        format!("could not connect to {addr}"),
                    ));
                }
                Notification::PairingRequired => {
                    return Err(CliError::new(
                        PAIRING_REQUIRED,
                        "pairing has not completed; pair the brick and retry",
                    ));
                }
                other => debug!(?other, "notification while connecting"),
            }
        }

        Ok(Self {
            manager,
            rx,
            addr: addr.to_string(),
            _owner: owner,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Enqueue a command on the session.
    pub fn submit(&self, command: Command) -> CliResult<()> {
        self.manager
            .submit(command)
            .map_err(|err| session_error("submit failed", err))
    }

    /// Wait for the next reply of `kind`, skipping unrelated chatter.
    pub fn await_reply(&self, kind: ReplyKind, timeout: Duration) -> CliResult<Bytes> {
        let deadline = Instant::now() + timeout;
        loop {
            match recv_deadline(&self.rx, deadline)? {
                Notification::Reply { kind: got, frame } if got == kind => return Ok(frame),
                Notification::Reply { kind: got, .. } => {
                    debug!(?got, "skipping reply of another family")
                }
                Notification::Advisory(text) => info!("{text}"),
                Notification::SendError => {
                    return Err(CliError::new(FAILURE, "sending the command failed"));
                }
                Notification::ReceiveError => {
                    return Err(CliError::new(FAILURE, "connection to the brick was lost"));
                }
                other => debug!(?other, "notification while waiting for a reply"),
            }
        }
    }

    /// The next notification, if one arrives before the timeout.
    pub fn next_event(&self, timeout: Duration) -> Option<Notification> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Disconnect cleanly: the stop volley and settle delay run on the
    /// dispatch thread before the link closes.
    pub fn close(mut self) {
        let _ = self.manager.submit(Command::Disconnect);
        self.manager.release();
    }
}

fn recv_deadline(rx: &Receiver<Notification>, deadline: Instant) -> CliResult<Notification> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(timed_out());
    }
    rx.recv_timeout(remaining).map_err(|err| match err {
        RecvTimeoutError::Timeout => timed_out(),
        RecvTimeoutError::Disconnected => CliError::new(FAILURE, "session closed"),
    })
}

fn timed_out() -> CliError {
    CliError::new(TIMEOUT, "timed out waiting for the brick")
}
