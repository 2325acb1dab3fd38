//! [`Connector`] that opens PTY shell sessions over SSH.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use secrecy::{ExposeSecret, SecretString};

use super::config::{AuthMethod, HostKeyVerification, SshConfig};
use super::ssh::SshTransport;
use crate::channel::{Connector, PtyConfig, PtySession, Target};
use crate::error::{Result, TransportError};

/// Opens interactive SSH shells for fingerprinting.
///
/// The target's secret is used as the login password, or as the key
/// passphrase when a private key is configured.
///
/// # Example
///
/// ```rust,no_run
/// use netprint::transport::SshConnector;
/// use netprint::transport::HostKeyVerification;
///
/// let connector = SshConnector::new()
///     .host_key_verification(HostKeyVerification::AcceptNew)
///     .terminal_size(511, 24);
/// ```
#[derive(Debug, Default)]
pub struct SshConnector {
    private_key: Option<PathBuf>,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    pty: PtyConfig,
}

impl SshConnector {
    /// Password authentication, host keys accepted without checking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate with a private key instead of a password.
    pub fn private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key = Some(path.into());
        self
    }

    /// Set the host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a known_hosts file other than `~/.ssh/known_hosts`.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.pty.terminal_width = width;
        self.pty.terminal_height = height;
        self
    }

    /// Replace the PTY read behavior wholesale.
    pub fn pty_config(mut self, pty: PtyConfig) -> Self {
        self.pty = pty;
        self
    }

    fn ssh_config(&self, target: &Target, timeout: Duration) -> SshConfig {
        let secret = target.secret.expose_secret();
        let auth = match &self.private_key {
            Some(path) => AuthMethod::PrivateKey {
                path: path.clone(),
                passphrase: (!secret.is_empty()).then(|| SecretString::from(secret.to_string())),
            },
            None => AuthMethod::Password(SecretString::from(secret.to_string())),
        };

        SshConfig {
            host: target.host.clone(),
            port: target.port,
            username: target.username.clone(),
            auth,
            timeout,
            terminal_width: self.pty.terminal_width,
            terminal_height: self.pty.terminal_height,
            host_key_verification: self.host_key_verification.clone(),
            known_hosts_path: self.known_hosts_path.clone(),
        }
    }
}

impl Connector for SshConnector {
    type Session = PtySession;

    async fn open(&self, target: &Target, timeout: Duration) -> Result<PtySession> {
        let config = self.ssh_config(target, timeout);
        let addr = config.socket_addr();

        let open = async {
            let transport = SshTransport::connect(config).await?;
            let channel = transport.open_channel().await?;
            Ok::<_, crate::Error>(PtySession::new(transport, channel, self.pty.clone()))
        };

        let session = tokio::time::timeout(timeout, open)
            .await
            .map_err(|_| TransportError::Timeout(timeout))??;

        debug!("shell open on {}", addr);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_auth_from_target() {
        let target = Target::new("10.0.0.1", "admin", "pw").with_port(2222);
        let config = SshConnector::new().ssh_config(&target, Duration::from_secs(3));

        assert_eq!(config.socket_addr(), "10.0.0.1:2222");
        assert_eq!(config.username, "admin");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.terminal_width, 511);
        match config.auth {
            AuthMethod::Password(password) => assert_eq!(password.expose_secret(), "pw"),
            other => panic!("unexpected auth: {other:?}"),
        }
    }

    #[test]
    fn test_private_key_uses_secret_as_passphrase() {
        let connector = SshConnector::new()
            .private_key("/tmp/id_ed25519")
            .terminal_size(200, 50);

        let with_phrase = connector.ssh_config(&Target::new("h", "u", "phrase"), Duration::ZERO);
        match with_phrase.auth {
            AuthMethod::PrivateKey { path, passphrase } => {
                assert_eq!(path, PathBuf::from("/tmp/id_ed25519"));
                assert_eq!(passphrase.map(|p| p.expose_secret().to_string()).as_deref(), Some("phrase"));
            }
            other => panic!("unexpected auth: {other:?}"),
        }
        assert_eq!(with_phrase.terminal_width, 200);
        assert_eq!(with_phrase.terminal_height, 50);

        let without = connector.ssh_config(&Target::new("h", "u", ""), Duration::ZERO);
        assert!(matches!(
            without.auth,
            AuthMethod::PrivateKey { passphrase: None, .. }
        ));
    }
}
