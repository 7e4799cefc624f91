//! Output Buffer
//!
//! A growable byte region holding frames queued for one server.
//!
//! Bytes enter at the tail (`append`) and leave from the front (`consume`).
//! Growth preserves every queued byte at its offset; an append either fully
//! succeeds or leaves the buffer untouched.

use crate::error::Result;

/// Pending-output byte region for a single server connection
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create an empty buffer with a starting capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of queued bytes
    pub fn available(&self) -> usize {
        self.data.len()
    }

    /// Allocated capacity
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grow the backing storage so that `capacity >= available + additional`.
    ///
    /// Queued bytes keep their contents and offsets across growth. Allocation
    /// failure surfaces as [`crate::HiveError::OutOfMemory`] with the buffer
    /// unchanged. Growth is amortized (doubling), so a steady stream of small
    /// appends stays cheap.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        self.data.try_reserve(additional)?;
        Ok(())
    }

    /// Copy `bytes` to the tail, advancing `available` by exactly their
    /// length. All-or-nothing: a failed reservation appends nothing.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_capacity(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Queued bytes, oldest first. The transport writes from the front of
    /// this slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Remove the first `n` bytes, shifting the remaining tail forward.
    /// Called by the transport after a successful socket write.
    ///
    /// # Panics
    /// Panics if `n > available()`.
    pub fn consume(&mut self, n: usize) {
        self.data.drain(..n);
    }
}
