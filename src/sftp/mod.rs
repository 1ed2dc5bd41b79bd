//! SFTP binding for buffered remote reads
//!
//! [`SftpSession`] implements [`RemoteRead`](crate::RemoteRead) on top of
//! the `russh-sftp` client, with [`RemoteFile`] as the file handle.

pub mod client;
pub mod session;

pub use client::SftpClient;
pub use session::{RemoteFile, SftpSession, SharedSftpSession};
