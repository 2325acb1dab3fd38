//! PTY-backed [`Session`] over an SSH shell channel.

use std::time::Duration;

use log::{debug, trace};
use russh::ChannelMsg;
use russh::client::Msg;
use tokio::time::Instant;

use super::buffer::SessionBuffer;
use super::session::{Session, SessionCloser};
use crate::error::ChannelError;
use crate::transport::SshTransport;

/// Configuration for PTY session behavior.
#[derive(Debug, Clone)]
pub struct PtyConfig {
    /// Longest a single read keeps draining a device that never goes quiet.
    pub max_read: Duration,

    /// Quiet period after which the device is considered drained.
    pub poll_interval: Duration,

    /// Terminal width.
    pub terminal_width: u32,

    /// Terminal height.
    pub terminal_height: u32,
}

impl Default for PtyConfig {
    fn default() -> Self {
        Self {
            max_read: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
            terminal_width: 511,
            terminal_height: 24,
        }
    }
}

/// Interactive shell session on an SSH connection.
pub struct PtySession {
    /// Configuration for this session.
    config: PtyConfig,

    /// The connection the shell channel lives on.
    transport: Option<SshTransport>,

    /// The shell channel.
    channel: russh::Channel<Msg>,

    /// Output received but not yet handed out.
    buffer: SessionBuffer,

    /// Whether the peer has sent EOF/close.
    eof: bool,

    closer: SessionCloser,
}

impl PtySession {
    /// Wrap an open shell channel.
    pub fn new(transport: SshTransport, channel: russh::Channel<Msg>, config: PtyConfig) -> Self {
        Self {
            config,
            transport: Some(transport),
            channel,
            buffer: SessionBuffer::default(),
            eof: false,
            closer: SessionCloser::new(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PtyConfig {
        &self.config
    }

    async fn drain(&mut self, settle: Duration) -> Result<String, ChannelError> {
        tokio::time::sleep(settle).await;

        let deadline = Instant::now() + self.config.max_read;
        while !self.eof {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("read cut off after {:?}, device still sending", self.config.max_read);
                break;
            }

            let wait = self.config.poll_interval.min(remaining);
            match tokio::time::timeout(wait, self.channel.wait()).await {
                Ok(Some(ChannelMsg::Data { data })) => self.buffer.extend(&data),
                Ok(Some(ChannelMsg::ExtendedData { data, .. })) => self.buffer.extend(&data),
                Ok(Some(ChannelMsg::Eof | ChannelMsg::Close)) | Ok(None) => {
                    debug!("shell channel closed by peer");
                    self.eof = true;
                }
                Ok(Some(msg)) => trace!("ignoring channel message: {:?}", msg),
                // Quiet for a full poll interval
                Err(_) => break,
            }
        }

        if self.eof && self.buffer.is_empty() {
            return Err(ChannelError::Closed);
        }

        trace!(
            "drained {} bytes, tail: {:?}",
            self.buffer.len(),
            String::from_utf8_lossy(self.buffer.tail_line())
        );
        Ok(self.buffer.take_string())
    }
}

impl Session for PtySession {
    async fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        if self.eof || self.closer.is_closed() {
            return Err(ChannelError::Closed);
        }
        trace!("send: {:?}", text);
        self.channel.data(text.as_bytes()).await?;
        Ok(())
    }

    async fn read_available(&mut self, settle: Duration) -> Result<String, ChannelError> {
        let closer = self.closer.clone();
        tokio::select! {
            _ = closer.closed() => Err(ChannelError::Closed),
            read = self.drain(settle) => read,
        }
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        self.closer.close();
        if !self.eof {
            // Best effort: the peer may already be gone.
            let _ = self.channel.eof().await;
            let _ = self.channel.close().await;
            self.eof = true;
        }
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }

    fn closer(&self) -> SessionCloser {
        self.closer.clone()
    }
}
