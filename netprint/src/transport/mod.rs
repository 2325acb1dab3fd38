//! SSH transport layer wrapping russh.
//!
//! This module provides the low-level SSH connection management,
//! handling connection setup, authentication, and shell channel creation.
//! [`SshConnector`] plugs it into the fingerprinting protocol.

pub mod config;
mod connector;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use connector::SshConnector;
pub use ssh::SshTransport;
