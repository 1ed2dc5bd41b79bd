//! Buffered remote reads over an SFTP client connection
//!
//! A [`ReadBuffer`] owns one fixed-capacity scratch buffer and forwards
//! "read N bytes at offset O from file F" to a caller-supplied connection
//! implementing [`RemoteRead`]. The [`sftp`] module provides that
//! connection on top of `russh-sftp`.

pub mod config;
pub mod error;
pub mod logging;
pub mod read_buffer;
pub mod remote;
pub mod sftp;

pub use read_buffer::{DEFAULT_CAPACITY, ReadBuffer};
pub use remote::RemoteRead;
pub use sftp::{RemoteFile, SftpClient, SftpSession};
