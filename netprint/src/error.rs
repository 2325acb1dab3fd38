//! Error types for netprint.

use std::time::Duration;

use thiserror::Error;

/// Main error type for netprint operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Fingerprinting protocol failures
    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// Template repository and parsing errors
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Private key could not be loaded
    #[error("Key error: {0}")]
    Key(String),

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host not present in known_hosts under strict verification
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Session channel errors (send/read on an open session).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Failed to open the interactive shell channel
    #[error("Failed to open shell channel: {0}")]
    OpenFailed(russh::Error),

    /// Channel closed, either by the peer or by a `SessionCloser`
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(#[from] russh::Error),
}

/// Fatal (and one non-fatal) outcomes of a fingerprinting run.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The session could not be established or was lost mid-run.
    #[error("Connection to {host} failed: {source}")]
    ConnectionFailed {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No line of the probe output looked like a CLI prompt.
    #[error("No prompt detected on {host}")]
    PromptNotDetected { host: String },

    /// The version command produced no output at all.
    #[error("No version output received from {host}")]
    NoVersionOutput { host: String },

    /// No template parsed the version output, even with the broadened hint.
    #[error("No template matched version output from {host} (hint: {hint:?})")]
    NoTemplateMatch { host: String, hint: Option<String> },

    /// A configured prompt or error pattern is not a valid regex.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The task fingerprinting this host panicked or was cancelled.
    #[error("Fingerprint task for {host} did not complete: {source}")]
    TaskFailed {
        host: String,
        #[source]
        source: tokio::task::JoinError,
    },

    /// Neighbor discovery failed. Logged by the protocol, never returned.
    #[error("Neighbor command '{command}' failed: {source}")]
    NeighborFetchFailed {
        command: String,
        #[source]
        source: ChannelError,
    },
}

impl FingerprintError {
    /// Wrap any session-level failure as `ConnectionFailed`.
    pub(crate) fn connection(
        host: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConnectionFailed {
            host: host.into(),
            source: source.into(),
        }
    }
}

/// Template repository and template parsing errors.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The backing store could not be opened or read.
    #[error("Template repository unavailable at '{location}': {reason}")]
    RepositoryUnavailable { location: String, reason: String },

    /// A template body failed to compile.
    #[error("Invalid template '{id}': {reason}")]
    InvalidTemplate { id: String, reason: String },

    /// A compiled template failed on the input text.
    #[error("Template '{id}' failed to parse input: {reason}")]
    Parse { id: String, reason: String },
}

/// Result type alias using netprint's Error.
pub type Result<T> = std::result::Result<T, Error>;
