//! Buffered remote read adapter
//!
//! [`ReadBuffer`] turns "read N bytes at offset O from handle F" into a
//! single call on a [`RemoteRead`] connection, landing the bytes at the
//! start of a scratch buffer owned by the adapter. The buffer is allocated
//! once and reused, so data from one call must be consumed (or copied out)
//! before the next one overwrites it.

use std::collections::TryReserveError;

use crate::config::ReadSettings;
use crate::error::ConfigError;
use crate::remote::RemoteRead;

/// Scratch capacity used by [`ReadBuffer::new`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Reusable read buffer over a borrowed connection.
///
/// The connection is not owned: opening and closing it, and every file
/// handle passed in, stays with the caller.
pub struct ReadBuffer<'c, C: RemoteRead> {
    conn: &'c C,
    buf: Box<[u8]>,
}

impl<C: RemoteRead> std::fmt::Debug for ReadBuffer<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadBuffer")
            .field("capacity", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl<'c, C: RemoteRead> ReadBuffer<'c, C> {
    /// Create an adapter with a [`DEFAULT_CAPACITY`] byte buffer.
    pub fn new(conn: &'c C) -> Self {
        Self::with_capacity(conn, DEFAULT_CAPACITY)
    }

    /// Create an adapter with a buffer of exactly `capacity` bytes.
    pub fn with_capacity(conn: &'c C, capacity: usize) -> Self {
        Self {
            conn,
            buf: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Like [`with_capacity`](Self::with_capacity), but reports allocation
    /// failure instead of aborting.
    pub fn try_with_capacity(conn: &'c C, capacity: usize) -> Result<Self, TryReserveError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        buf.resize(capacity, 0);

        Ok(Self {
            conn,
            buf: buf.into_boxed_slice(),
        })
    }

    /// Create an adapter sized from the `[read]` settings section.
    ///
    /// Settings built in code skip the checks done on load, so the capacity
    /// is validated here before anything is allocated.
    pub fn from_settings(conn: &'c C, settings: &ReadSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::with_capacity(conn, settings.capacity))
    }

    /// Size of the scratch buffer in bytes. Fixed for the adapter's lifetime.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The whole scratch buffer. Only the prefix reported by the last read
    /// holds fresh data.
    pub fn buffer(&self) -> &[u8] {
        &self.buf
    }

    /// The connection reads are forwarded to.
    pub fn connection(&self) -> &'c C {
        self.conn
    }

    fn window(&self, length: usize) -> usize {
        if length > self.buf.len() {
            tracing::debug!(
                requested = length,
                capacity = self.buf.len(),
                "Read length exceeds buffer capacity, clamping"
            );
            self.buf.len()
        } else {
            length
        }
    }

    /// Read up to `length` bytes at `offset` into the start of the buffer.
    ///
    /// Issues exactly one `read_at` on the connection and returns its count
    /// as is: it may be short, and it is 0 at end of file. `length` larger
    /// than [`capacity`](Self::capacity) is clamped. Errors from the
    /// connection come back unchanged.
    pub async fn read_into(
        &mut self,
        handle: &mut C::Handle,
        offset: u64,
        length: usize,
    ) -> Result<usize, C::Error> {
        let len = self.window(length);
        let read = self.conn.read_at(handle, offset, &mut self.buf[..len]).await?;

        tracing::trace!(offset, requested = length, read, "Remote read");
        Ok(read)
    }

    /// Same as `read_into(handle, 0, length)`.
    pub async fn read_into_start(
        &mut self,
        handle: &mut C::Handle,
        length: usize,
    ) -> Result<usize, C::Error> {
        self.read_into(handle, 0, length).await
    }

    /// [`read_into`](Self::read_into), returning the filled prefix.
    ///
    /// The slice borrows the adapter, so it has to be dropped before the
    /// next read.
    pub async fn read_chunk(
        &mut self,
        handle: &mut C::Handle,
        offset: u64,
        length: usize,
    ) -> Result<&[u8], C::Error> {
        let read = self.read_into(handle, offset, length).await?;
        let end = read.min(self.buf.len());
        Ok(&self.buf[..end])
    }

    /// Keep reading until `length` bytes (clamped to capacity) are in the
    /// buffer or the connection reports end of file.
    ///
    /// Returns the number of bytes placed. A failure part way through is
    /// returned as is; bytes already read stay in the buffer.
    pub async fn fill(
        &mut self,
        handle: &mut C::Handle,
        offset: u64,
        length: usize,
    ) -> Result<usize, C::Error> {
        let want = self.window(length);
        let mut filled = 0;

        while filled < want {
            let pos = offset.saturating_add(filled as u64);
            let read = self
                .conn
                .read_at(handle, pos, &mut self.buf[filled..want])
                .await?;
            if read == 0 {
                break;
            }
            filled = (filled + read).min(want);
        }

        tracing::trace!(offset, requested = length, filled, "Remote fill");
        Ok(filled)
    }

    /// Blocking form of [`read_into`](Self::read_into) for synchronous
    /// callers. Must not be called from within the runtime's own workers.
    pub fn read_into_blocking(
        &mut self,
        runtime: &tokio::runtime::Handle,
        handle: &mut C::Handle,
        offset: u64,
        length: usize,
    ) -> Result<usize, C::Error> {
        runtime.block_on(self.read_into(handle, offset, length))
    }
}
