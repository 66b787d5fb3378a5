//! Remote command relay.
//!
//! Opens one SSH session to the configured host per call, runs exactly one
//! command and returns its output. No pooling, no retry, no streaming.

use crate::config::Settings;
use ssh2::Session;
use std::io::Read;
use std::net::TcpStream;
use thiserror::Error;
use tracing::debug;

/// Errors raised while talking to the remote host
#[derive(Error, Debug)]
pub enum RelayError {
    /// TCP connection to the remote host could not be established
    #[error("failed to connect to {0}: {1}")]
    Connect(String, #[source] std::io::Error),
    /// Handshake, channel or protocol-level SSH failure
    #[error("SSH session error: {0}")]
    Session(#[from] ssh2::Error),
    /// Credentials were rejected by the remote host
    #[error("SSH authentication failed for user {0}")]
    Auth(String),
    /// Reading the command output failed
    #[error("failed to read command output: {0}")]
    Io(#[from] std::io::Error),
    /// The blocking relay task panicked or was cancelled
    #[error("relay task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Executes single commands on one statically configured remote host.
///
/// Constructed once at startup and passed to handlers as an explicit
/// dependency; every call opens and closes its own session.
#[derive(Clone)]
pub struct SshRelay {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl SshRelay {
    /// Builds a relay from the loaded settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            host: settings.ssh_host.clone(),
            port: settings.ssh_port,
            username: settings.ssh_username.clone(),
            password: settings.ssh_password.clone(),
        }
    }

    /// Runs `command` on the remote host and returns its output.
    ///
    /// The stderr channel wins: if the command wrote anything to stderr,
    /// that text is returned instead of stdout, so remote errors reach the
    /// operator as the reply body. The session is closed unconditionally
    /// when the call finishes.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError`] if the connection, handshake or
    /// authentication fails. No retry is performed.
    pub async fn run(&self, command: &str) -> Result<String, RelayError> {
        let relay = self.clone();
        let command = command.to_string();
        debug!("relaying command: {}", command);
        tokio::task::spawn_blocking(move || relay.run_blocking(&command)).await?
    }

    fn run_blocking(&self, command: &str) -> Result<String, RelayError> {
        let addr = format!("{}:{}", self.host, self.port);
        let tcp =
            TcpStream::connect(&addr).map_err(|e| RelayError::Connect(addr.clone(), e))?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;
        session.userauth_password(&self.username, &self.password)?;
        if !session.authenticated() {
            return Err(RelayError::Auth(self.username.clone()));
        }

        let mut channel = session.channel_session()?;
        channel.exec(command)?;

        let mut stdout = String::new();
        channel.read_to_string(&mut stdout)?;
        let mut stderr = String::new();
        channel.stderr().read_to_string(&mut stderr)?;
        let _ = channel.wait_close();

        // Session and channel are dropped here, closing the connection
        Ok(if stderr.is_empty() { stdout } else { stderr })
    }
}
