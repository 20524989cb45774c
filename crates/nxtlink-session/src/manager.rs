use std::sync::Arc;
use std::thread::{self, ThreadId};

use bytes::Bytes;
use nxtlink_transport::{Connector, RfcommConnector};

use crate::command::{Command, CommandSender};
use crate::error::{Result, SessionError};
use crate::notification::NotificationSender;
use crate::owner::SessionOwner;
use crate::session::{Session, SessionConfig};

/// Owns the process's single active [`Session`].
///
/// The manager must live on the thread that consumes notifications.
/// `acquire`, `start` and `release` enforce that affinity and panic when
/// called from anywhere else — such a call is a programming defect that
/// would let lifecycle mutation race the worker's own teardown, and must
/// fail loudly rather than silently.
pub struct SessionManager {
    home: ThreadId,
    current: Option<Session>,
}

impl SessionManager {
    /// Create a manager bound to the calling thread.
    pub fn new() -> Self {
        Self {
            home: thread::current().id(),
            current: None,
        }
    }

    /// Replace any prior session with a fresh one for `addr`.
    ///
    /// The prior session, if any, is destroyed synchronously — transport
    /// closed, pending state discarded — before the new one exists.
    ///
    /// The session holds `owner` only weakly; the caller keeps it alive
    /// for as long as the pairing flag should be observable.
    pub fn acquire(
        &mut self,
        owner: Arc<dyn SessionOwner>,
        sink: Option<NotificationSender>,
        addr: impl Into<String>,
    ) -> &mut Session {
        self.acquire_with(
            owner,
            sink,
            addr,
            Box::new(RfcommConnector),
            SessionConfig::default(),
        )
    }

    /// [`SessionManager::acquire`] with an explicit connect strategy and
    /// configuration.
    pub fn acquire_with(
        &mut self,
        owner: Arc<dyn SessionOwner>,
        sink: Option<NotificationSender>,
        addr: impl Into<String>,
        connector: Box<dyn Connector>,
        config: SessionConfig,
    ) -> &mut Session {
        self.assert_home("acquire");
        if let Some(mut old) = self.current.take() {
            old.release();
        }
        self.current
            .insert(Session::new(owner, sink, addr.into(), connector, config))
    }

    /// Connect the acquired session and start its I/O threads.
    pub fn start(&mut self) -> Result<()> {
        self.assert_home("start");
        match &mut self.current {
            Some(session) => session.start(),
            None => Err(SessionError::NotConnected),
        }
    }

    /// Destroy the active session. Idempotent.
    pub fn release(&mut self) {
        self.assert_home("release");
        if let Some(mut session) = self.current.take() {
            session.release();
        }
    }

    /// The active session, if one has been acquired.
    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// The current status of the connection.
    pub fn is_connected(&self) -> bool {
        self.current.as_ref().is_some_and(Session::is_connected)
    }

    /// The most recently received telegram.
    pub fn last_reply(&self) -> Option<Bytes> {
        self.current.as_ref().and_then(Session::last_reply)
    }

    /// A clonable command handle for the active session.
    pub fn commander(&self) -> Option<CommandSender> {
        self.current.as_ref().and_then(Session::commander)
    }

    /// Enqueue a command on the active session.
    pub fn submit(&self, command: Command) -> Result<()> {
        match self.commander() {
            Some(commander) => {
                commander.submit(command);
                Ok(())
            }
            None => Err(SessionError::NotConnected),
        }
    }

    fn assert_home(&self, operation: &str) {
        if thread::current().id() != self.home {
            panic!("SessionManager::{operation} called from an invalid thread");
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::PairingFlag;

    #[test]
    fn submit_without_a_session_is_an_error() {
        let manager = SessionManager::new();
        assert!(matches!(
            manager.submit(Command::StopProgram),
            Err(SessionError::NotConnected)
        ));
    }

    #[test]
    fn start_without_a_session_is_an_error() {
        let mut manager = SessionManager::new();
        assert!(matches!(manager.start(), Err(SessionError::NotConnected)));
    }

    #[test]
    fn release_is_idempotent() {
        let mut manager = SessionManager::new();
        manager.release();
        manager.release();
    }

    #[test]
    fn lifecycle_calls_off_the_home_thread_panic() {
        let mut manager = SessionManager::new();
        let handle = thread::spawn(move || {
            manager.release();
        });
        assert!(handle.join().is_err());
    }

    #[test]
    fn acquire_off_the_home_thread_panics() {
        let mut manager = SessionManager::new();
        let handle = thread::spawn(move || {
            manager.acquire(PairingFlag::new(false), None, "00:16:53:00:00:01");
        });
        assert!(handle.join().is_err());
    }
}
