//! SFTP session setup over an established byte stream

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use russh_sftp::client::RawSftpSession;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::timeout;

use crate::error::SftpError;

use super::session::{SftpSession, SharedSftpSession};

/// Starts SFTP sessions on streams the caller already owns, typically an
/// SSH channel with the `sftp` subsystem requested.
pub struct SftpClient {
    init_timeout: Duration,
}

impl Default for SftpClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl SftpClient {
    pub fn new(init_timeout: Duration) -> Self {
        Self { init_timeout }
    }

    pub fn init_timeout(&self) -> Duration {
        self.init_timeout
    }

    /// Run the SFTP version handshake on `stream` and wrap the session
    pub async fn connect_stream<S>(&self, stream: S) -> Result<SharedSftpSession, SftpError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let sftp = RawSftpSession::new(stream);
        match timeout(self.init_timeout, sftp.init()).await {
            Ok(Ok(version)) => {
                tracing::debug!("SFTP server speaks protocol version {}", version.version);
            }
            Ok(Err(e)) => {
                return Err(SftpError::ConnectionFailed(format!(
                    "Failed to initialize SFTP session: {}",
                    e
                )));
            }
            Err(_) => {
                return Err(SftpError::ConnectionFailed(
                    "SFTP session setup timed out".to_string(),
                ));
            }
        }

        let home_dir = self.get_home_dir(&sftp).await;
        tracing::info!("SFTP session established (home {})", home_dir.display());

        Ok(Arc::new(SftpSession::new(sftp, home_dir)))
    }

    /// Get the remote user's home directory
    async fn get_home_dir(&self, sftp: &RawSftpSession) -> PathBuf {
        // "." resolves to the login directory on most servers
        match timeout(Duration::from_secs(5), sftp.realpath(".")).await {
            Ok(Ok(name)) => name
                .files
                .into_iter()
                .next()
                .map(|file| PathBuf::from(file.filename))
                .unwrap_or_else(|| PathBuf::from("/")),
            Ok(Err(_)) | Err(_) => PathBuf::from("/"),
        }
    }
}
