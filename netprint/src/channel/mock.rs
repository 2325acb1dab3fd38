//! Scripted in-memory sessions for testing code built on [`Session`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::session::{Connector, Session, SessionCloser, Target};
use crate::error::{ChannelError, Result, TransportError};

/// How a [`MockSession`] answers a command.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Emit this text.
    Output(String),

    /// Echo the command back followed by the session prompt.
    Echo,

    /// Emit nothing.
    Silent,

    /// Never answer; the next read blocks until the caller gives up.
    Hang,

    /// The next read fails as if the channel dropped.
    Fail,
}

/// Shared record of what a [`MockSession`] saw, readable after the session
/// has been moved into the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockLog {
    sent: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl MockLog {
    /// Commands sent so far, trimmed of their line terminator.
    pub fn commands(&self) -> Vec<String> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether `close()` was called on the session.
    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn record(&self, command: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command.to_string());
    }
}

#[derive(Debug, Default)]
enum Pending {
    #[default]
    Nothing,
    Hang,
    Fail,
}

/// A session that answers commands from a script.
#[derive(Debug)]
pub struct MockSession {
    prompt: String,
    replies: HashMap<String, MockReply>,
    default_reply: MockReply,
    output: String,
    pending: Pending,
    log: MockLog,
    closer: SessionCloser,
}

impl MockSession {
    /// A session with no script: every command is answered with silence.
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            replies: HashMap::new(),
            default_reply: MockReply::Silent,
            output: String::new(),
            pending: Pending::default(),
            log: MockLog::default(),
            closer: SessionCloser::new(),
        }
    }

    /// A well-behaved device: a bare newline returns `prompt`, and every
    /// unscripted command is echoed back followed by `prompt`.
    pub fn device(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        let mut session = Self::new();
        session.replies.insert(String::new(), MockReply::Output(format!("\n{prompt}")));
        session.default_reply = MockReply::Echo;
        session.prompt = prompt;
        session
    }

    /// Output already waiting when the session opens (login banner).
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.output.push_str(&banner.into());
        self
    }

    /// Answer `command` with `output`, followed by the prompt if one is set.
    pub fn reply(self, command: impl Into<String>, output: impl Into<String>) -> Self {
        let output = if self.prompt.is_empty() {
            output.into()
        } else {
            format!("{}\n{}", output.into(), self.prompt)
        };
        self.reply_with(command, MockReply::Output(output))
    }

    /// Answer `command` with an arbitrary reply.
    pub fn reply_with(mut self, command: impl Into<String>, reply: MockReply) -> Self {
        self.replies.insert(command.into(), reply);
        self
    }

    /// Reply used for commands without a scripted answer.
    pub fn default_reply(mut self, reply: MockReply) -> Self {
        self.default_reply = reply;
        self
    }

    /// Handle for inspecting the session after it has been moved.
    pub fn log(&self) -> MockLog {
        self.log.clone()
    }

    async fn settle_and_take(&mut self, settle: Duration) -> std::result::Result<String, ChannelError> {
        tokio::time::sleep(settle).await;
        match std::mem::take(&mut self.pending) {
            Pending::Nothing => {}
            Pending::Hang => std::future::pending::<()>().await,
            Pending::Fail => return Err(ChannelError::Closed),
        }
        Ok(std::mem::take(&mut self.output))
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for MockSession {
    async fn send(&mut self, text: &str) -> std::result::Result<(), ChannelError> {
        if self.closer.is_closed() {
            return Err(ChannelError::Closed);
        }

        let command = text.trim();
        self.log.record(command);

        let reply = self
            .replies
            .get(command)
            .unwrap_or(&self.default_reply)
            .clone();

        match reply {
            MockReply::Output(text) => self.output.push_str(&text),
            MockReply::Echo => {
                self.output.push_str(command);
                self.output.push('\n');
                self.output.push_str(&self.prompt);
            }
            MockReply::Silent => {}
            MockReply::Hang => self.pending = Pending::Hang,
            MockReply::Fail => self.pending = Pending::Fail,
        }
        Ok(())
    }

    async fn read_available(&mut self, settle: Duration) -> std::result::Result<String, ChannelError> {
        let closer = self.closer.clone();
        tokio::select! {
            _ = closer.closed() => Err(ChannelError::Closed),
            read = self.settle_and_take(settle) => read,
        }
    }

    async fn close(&mut self) -> std::result::Result<(), ChannelError> {
        self.log.closed.store(true, Ordering::SeqCst);
        self.closer.close();
        Ok(())
    }

    fn closer(&self) -> SessionCloser {
        self.closer.clone()
    }
}

/// Connector handing out pre-scripted sessions by host.
///
/// Hosts without a session fail to connect with a timeout.
#[derive(Debug, Default)]
pub struct MockConnector {
    sessions: Mutex<HashMap<String, MockSession>>,
}

impl MockConnector {
    /// Create a connector with no reachable hosts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `host` reachable; the next `open` for it returns `session`.
    pub fn with_session(self, host: impl Into<String>, session: MockSession) -> Self {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(host.into(), session);
        self
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    async fn open(&self, target: &Target, timeout: Duration) -> Result<MockSession> {
        let session = self
            .sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&target.host);
        session.ok_or_else(|| TransportError::Timeout(timeout).into())
    }
}
