//! Session lifecycle and command/notification channel for the NXT brick.
//!
//! This is the "just works" layer. A [`SessionManager`] owns at most one
//! active [`Session`]; the session runs a background I/O worker that turns
//! raw telegrams into [`Notification`]s, and a dispatch thread that
//! executes [`Command`]s submitted from any thread, in order.
//!
//! Threading contract: the thread that creates the manager is the
//! designated owner thread. It consumes notifications and is the only
//! thread allowed to call `acquire`/`start`/`release`. Commands may be
//! submitted from anywhere through a [`CommandSender`].

pub mod command;
mod dispatch;
pub mod error;
pub mod manager;
pub mod notification;
pub mod owner;
pub mod session;
mod worker;

pub use command::{Command, CommandSender};
pub use error::{Result, SessionError};
pub use manager::SessionManager;
pub use notification::{Notification, NotificationSender};
pub use owner::{PairingFlag, SessionOwner};
pub use session::{Session, SessionConfig};
