//! Capability interface over an interactive text session.
//!
//! The fingerprinting protocol only ever sees text in and text out. Anything
//! that can open a shell-like channel to a device (SSH, telnet, a serial
//! console, a recorded transcript) plugs in by implementing [`Connector`] and
//! [`Session`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::Notify;

use crate::error::{ChannelError, Result};

/// Device to fingerprint, with the credentials used to log in.
pub struct Target {
    /// Hostname or IP address.
    pub host: String,

    /// Port of the remote CLI service (default: 22).
    pub port: u16,

    /// Login username.
    pub username: String,

    /// Login password (or key passphrase, depending on the connector).
    pub secret: SecretString,
}

impl Target {
    /// Create a target on the default SSH port.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            secret: SecretString::from(secret.into()),
        }
    }

    /// Set a non-default port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// An open interactive session with one device.
///
/// Sessions are owned by exactly one fingerprinting run and never shared.
pub trait Session: Send {
    /// Send raw text. Callers append their own line terminator.
    fn send(&mut self, text: &str) -> impl Future<Output = std::result::Result<(), ChannelError>> + Send;

    /// Wait `settle`, then return everything the device has sent since the
    /// previous read.
    ///
    /// A quiet device yields an empty string. A session closed by the peer
    /// or by its [`SessionCloser`] yields [`ChannelError::Closed`].
    fn read_available(
        &mut self,
        settle: Duration,
    ) -> impl Future<Output = std::result::Result<String, ChannelError>> + Send;

    /// Close the session.
    fn close(&mut self) -> impl Future<Output = std::result::Result<(), ChannelError>> + Send;

    /// Handle another task can use to abort this session.
    fn closer(&self) -> SessionCloser;
}

/// Opens sessions to targets.
pub trait Connector: Send + Sync {
    /// The session type this connector produces.
    type Session: Session + 'static;

    /// Open an interactive session, giving up after `timeout`.
    fn open(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// Cross-task close signal for a [`Session`].
///
/// Triggering it makes any pending or future read on the session fail with
/// [`ChannelError::Closed`].
#[derive(Debug, Clone, Default)]
pub struct SessionCloser {
    inner: Arc<CloseSignal>,
}

#[derive(Debug, Default)]
struct CloseSignal {
    closed: AtomicBool,
    notify: Notify,
}

impl SessionCloser {
    /// Create an untriggered closer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the session to close.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Check whether the close signal has been triggered.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Resolve once the close signal has been triggered.
    pub async fn closed(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }
}
