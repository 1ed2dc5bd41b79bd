//! The read primitive a connection must provide

use std::future::Future;

/// Positional read against an already-open remote file.
///
/// This is the `read(handle, offset, dst, dst_offset, len)` call of an SFTP
/// client, with the destination window passed as a single slice.
/// Implementations write at most `dst.len()` bytes into `dst` and return
/// how many were written. `Ok(0)` means end of file.
///
/// Errors are the connection's own and are handed back to the caller
/// untouched by [`ReadBuffer`](crate::ReadBuffer).
pub trait RemoteRead {
    /// Opaque handle obtained by opening a remote path on this connection.
    type Handle;
    /// Error raised by the underlying read.
    type Error;

    fn read_at(
        &self,
        handle: &mut Self::Handle,
        offset: u64,
        dst: &mut [u8],
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}
