//! SFTP integration tests
//!
//! Each test starts an in-memory `russh-sftp` server on one end of a
//! duplex pipe and an `SftpSession` on the other, so no SSH server or
//! network access is needed.
//!
//! ```bash
//! cargo test --test sftp_integration
//! ```


mod read_tests;
mod session_tests;
