use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, Weak};
use std::thread::JoinHandle;
use std::time::Duration;

use bytes::Bytes;
use nxtlink_lcp::{FrameConfig, LcpReader, LcpWriter};
use nxtlink_transport::{BrickStream, BtAddr, Connector};
use tracing::{debug, info, warn};

use crate::command::{Command, CommandSender};
use crate::dispatch::{self, DispatchContext};
use crate::error::{Result, SessionError};
use crate::notification::{Notification, NotificationSender};
use crate::owner::SessionOwner;
use crate::worker::{self, WorkerContext};

const NO_DEVICE_HINT: &str = "no paired NXT brick at this address";
const PAIRING_HINT: &str = "pairing has not completed; finish pairing and pick the device again";
const CLOSE_PROBLEM_HINT: &str = "problem while closing the connection";

/// Timing and framing knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Delay between the motor-stop volley and closing the link on
    /// disconnect, so the actuators come to rest before the radio drops.
    pub disconnect_settle: Duration,
    /// Pacing delay after a beep frame.
    pub beep_pacing: Duration,
    /// Framing configuration for both stream halves.
    pub frame: FrameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            disconnect_settle: Duration::from_millis(500),
            beep_pacing: Duration::from_millis(20),
            frame: FrameConfig::default(),
        }
    }
}

/// One connection to a brick: the transport, its I/O threads and the
/// channel endpoints. At most one exists per [`crate::SessionManager`].
pub struct Session {
    addr: String,
    owner: Option<Weak<dyn SessionOwner>>,
    sink: Option<NotificationSender>,
    connector: Box<dyn Connector>,
    config: SessionConfig,
    connected: Arc<AtomicBool>,
    closing: Arc<AtomicBool>,
    last_reply: Arc<Mutex<Option<Bytes>>>,
    cmd_tx: Option<mpsc::Sender<Command>>,
    control: Option<BrickStream>,
    worker: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
}

impl Session {
    pub(crate) fn new(
        owner: Arc<dyn SessionOwner>,
        sink: Option<NotificationSender>,
        addr: String,
        connector: Box<dyn Connector>,
        config: SessionConfig,
    ) -> Self {
        Self {
            addr,
            owner: Some(Arc::downgrade(&owner)),
            sink,
            connector,
            config,
            connected: Arc::new(AtomicBool::new(false)),
            closing: Arc::new(AtomicBool::new(false)),
            last_reply: Arc::new(Mutex::new(None)),
            cmd_tx: None,
            control: None,
            worker: None,
            dispatcher: None,
        }
    }

    /// The address this session was created for.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// The current status of the connection.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// The most recently received telegram, valid until the next one
    /// overwrites it.
    pub fn last_reply(&self) -> Option<Bytes> {
        self.last_reply
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// A clonable handle for submitting commands from any thread.
    /// `None` until the session is started.
    pub fn commander(&self) -> Option<CommandSender> {
        self.cmd_tx.clone().map(CommandSender::new)
    }

    /// Resolve the address and connect.
    ///
    /// With a sink attached, connect failures are reported as
    /// notifications and `Ok(())` is returned; without one, the same
    /// conditions come back as errors.
    pub(crate) fn start(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }

        let addr = match BtAddr::from_str(&self.addr) {
            Ok(addr) => addr,
            Err(err) => {
                debug!(%err, "address does not resolve to a device");
                return self.report(
                    Notification::ConnectError,
                    Some(NO_DEVICE_HINT),
                    SessionError::UnknownDevice(self.addr.clone()),
                );
            }
        };

        let stream = match self.connector.connect(addr) {
            Ok(stream) => stream,
            Err(primary_err) => {
                if self.owner_is_pairing() {
                    debug!("connect failed while pairing is in progress");
                    return self.report(
                        Notification::PairingRequired,
                        Some(PAIRING_HINT),
                        SessionError::PairingRequired,
                    );
                }
                match self.connector.connect_fallback(addr) {
                    Ok(stream) => stream,
                    Err(fallback_err) => {
                        debug!(%fallback_err, "fallback connect failed");
                        return self.report(
                            Notification::ConnectError,
                            None,
                            SessionError::ConnectFailed(primary_err),
                        );
                    }
                }
            }
        };

        match self.attach(stream) {
            Ok(()) => {
                info!(addr = %self.addr, "session connected");
                self.notify(Notification::Connected);
                Ok(())
            }
            Err(err) => {
                debug!(%err, "session setup failed after connect");
                self.teardown_io();
                self.report(Notification::ConnectError, None, err)
            }
        }
    }

    /// Split the stream, start the worker and dispatch threads.
    fn attach(&mut self, stream: BrickStream) -> Result<()> {
        let reader_stream = stream.try_clone().map_err(SessionError::ConnectFailed)?;
        let control = stream.try_clone().map_err(SessionError::ConnectFailed)?;

        let reader = LcpReader::with_config_stream(reader_stream, self.config.frame.clone())
            .map_err(setup_error)?;
        let writer =
            LcpWriter::with_config_stream(stream, self.config.frame.clone()).map_err(setup_error)?;

        // Fresh flags per attach; a prior failed attempt left these set.
        self.connected = Arc::new(AtomicBool::new(true));
        self.closing = Arc::new(AtomicBool::new(false));
        self.control = Some(control);

        let (cmd_tx, cmd_rx) = mpsc::channel();
        self.cmd_tx = Some(cmd_tx);

        let dispatcher = std::thread::Builder::new()
            .name("nxtlink-dispatch".into())
            .spawn({
                let ctx = DispatchContext {
                    writer,
                    rx: cmd_rx,
                    connected: Arc::clone(&self.connected),
                    closing: Arc::clone(&self.closing),
                    sink: self.sink.clone(),
                    config: self.config.clone(),
                };
                move || dispatch::run(ctx)
            })
            .map_err(spawn_error)?;
        self.dispatcher = Some(dispatcher);

        let worker = std::thread::Builder::new()
            .name("nxtlink-worker".into())
            .spawn({
                let ctx = WorkerContext {
                    reader,
                    connected: Arc::clone(&self.connected),
                    last_reply: Arc::clone(&self.last_reply),
                    sink: self.sink.clone(),
                };
                move || worker::run(ctx)
            })
            .map_err(spawn_error)?;
        self.worker = Some(worker);

        Ok(())
    }

    /// Tear the session down. Idempotent; safe to call when already
    /// released.
    pub(crate) fn release(&mut self) {
        let was_connected = self.teardown_io();

        self.last_reply
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        self.owner = None;
        self.sink = None;

        if was_connected {
            debug!(addr = %self.addr, "session released");
        }
    }

    /// Stop the threads and close the transport, leaving the owner and
    /// sink in place. Returns whether the session had been connected.
    ///
    /// The dispatch thread is joined before the stream is shut down so
    /// commands queued ahead of the teardown still reach the wire in
    /// order; the worker's blocked read is then unblocked by the
    /// shutdown.
    fn teardown_io(&mut self) -> bool {
        self.closing.store(true, Ordering::SeqCst);
        let was_connected = self.connected.swap(false, Ordering::SeqCst);

        // Dropping the sender lets the dispatch thread drain and exit.
        self.cmd_tx = None;
        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.join();
        }

        if let Some(control) = self.control.take() {
            if let Err(err) = control.shutdown() {
                warn!(%err, "shutdown during release");
                self.notify(Notification::Advisory(CLOSE_PROBLEM_HINT.to_string()));
            }
        }

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        was_connected
    }

    fn owner_is_pairing(&self) -> bool {
        self.owner
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|owner| owner.is_pairing())
    }

    fn notify(&self, notification: Notification) {
        if let Some(sink) = &self.sink {
            let _ = sink.send(notification);
        }
    }

    /// Report a failure: as notifications when a sink exists, as an
    /// error otherwise.
    fn report(
        &self,
        notification: Notification,
        advisory: Option<&str>,
        err: SessionError,
    ) -> Result<()> {
        match &self.sink {
            Some(sink) => {
                if let Some(text) = advisory {
                    let _ = sink.send(Notification::Advisory(text.to_string()));
                }
                let _ = sink.send(notification);
                Ok(())
            }
            None => Err(err),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("addr", &self.addr)
            .field("connected", &self.is_connected())
            .finish()
    }
}

fn setup_error(err: nxtlink_lcp::LcpError) -> SessionError {
    SessionError::ConnectFailed(nxtlink_transport::TransportError::Io(std::io::Error::other(
        err.to_string(),
    )))
}

fn spawn_error(err: std::io::Error) -> SessionError {
    SessionError::ConnectFailed(nxtlink_transport::TransportError::Io(err))
}
