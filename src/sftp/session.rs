//! SFTP session and the read primitive behind [`ReadBuffer`](crate::ReadBuffer)

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use russh_sftp::client::RawSftpSession;
use russh_sftp::client::error::Error as RusshSftpError;
use russh_sftp::protocol::{FileAttributes, OpenFlags, StatusCode};

use crate::error::SftpError;
use crate::remote::RemoteRead;

/// SFTP session wrapper for file reads.
///
/// Reads go out as plain `SSH_FXP_READ` requests carrying their own offset,
/// so no file cursor is shared between calls and a dropped read leaves
/// nothing behind for the next one.
pub struct SftpSession {
    sftp: RawSftpSession,
    home_dir: PathBuf,
}

impl std::fmt::Debug for SftpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SftpSession")
            .field("home_dir", &self.home_dir)
            .finish_non_exhaustive()
    }
}

impl SftpSession {
    /// Wrap a `russh-sftp` session whose version handshake is done
    pub fn new(sftp: RawSftpSession, home_dir: PathBuf) -> Self {
        Self { sftp, home_dir }
    }

    /// Remote working directory reported at session start
    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Open a remote file for reading
    pub async fn open(&self, path: &Path) -> Result<RemoteFile, SftpError> {
        let path_str = path.to_string_lossy().to_string();

        let handle = self
            .sftp
            .open(path_str.clone(), OpenFlags::READ, FileAttributes::default())
            .await
            .map_err(|e| {
                SftpError::FileOperation(format!("Failed to open remote file {}: {}", path_str, e))
            })?;

        tracing::debug!("Opened remote file {}", path_str);
        Ok(RemoteFile {
            path: path.to_path_buf(),
            handle: handle.handle,
        })
    }

    /// Close a handle returned by [`open`](Self::open)
    pub async fn close_file(&self, file: RemoteFile) -> Result<(), SftpError> {
        self.sftp.close(file.handle).await.map(|_| ()).map_err(|e| {
            SftpError::FileOperation(format!(
                "Failed to close remote file {}: {}",
                file.path.display(),
                e
            ))
        })
    }

    /// Get file size for a remote path
    pub async fn file_size(&self, path: &Path) -> Result<u64, SftpError> {
        let path_str = path.to_string_lossy().to_string();
        let attrs = self.sftp.stat(path_str.clone()).await.map_err(|e| {
            SftpError::FileOperation(format!("Failed to get metadata for {}: {}", path_str, e))
        })?;
        Ok(attrs.attrs.size.unwrap_or(0))
    }
}

impl RemoteRead for SftpSession {
    type Handle = RemoteFile;
    type Error = RusshSftpError;

    fn read_at(
        &self,
        handle: &mut RemoteFile,
        offset: u64,
        dst: &mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send {
        // SFTP read lengths are u32 on the wire
        let len = u32::try_from(dst.len()).unwrap_or(u32::MAX);
        let handle = handle.handle.clone();

        async move {
            if len == 0 {
                return Ok(0);
            }
            match self.sftp.read(handle, offset, len).await {
                Ok(data) => {
                    let n = data.data.len().min(dst.len());
                    dst[..n].copy_from_slice(&data.data[..n]);
                    Ok(n)
                }
                Err(RusshSftpError::Status(status)) if status.status_code == StatusCode::Eof => {
                    Ok(0)
                }
                Err(e) => Err(e),
            }
        }
    }
}

/// An open remote file on an [`SftpSession`]
pub struct RemoteFile {
    path: PathBuf,
    handle: String,
}

impl std::fmt::Debug for RemoteFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RemoteFile {
    /// Remote path this handle was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Thread-safe wrapper for SFTP session
pub type SharedSftpSession = Arc<SftpSession>;
