//! Server Handle
//!
//! Client-side state for one backend server connection.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;

use super::OutputBuffer;

/// One backend server: its identity and its exclusively-owned output buffer.
///
/// Two roles touch the buffer: the dispatcher appends at the tail and the
/// transport drains from the head, with the mutex keeping them strictly
/// alternating. The write-pending flag dedups reactor wakeups: it arms on
/// the first enqueue and stays armed until the transport drains the buffer
/// and [`clear_write_pending`](Self::clear_write_pending) confirms it is
/// empty. Frames enqueued while the flag is armed send no wakeup of their
/// own, so the clear re-checks the buffer and keeps the latch armed when
/// any slipped in between the drain and the clear.
pub struct Server {
    /// Backend address (host:port), kept for logging and identity
    address: String,

    /// Pending output, appended by the dispatcher, drained by the transport
    output: Mutex<OutputBuffer>,

    /// Armed while the transport owes this server a drain pass
    write_pending: AtomicBool,
}

impl Server {
    /// Create a server handle with a pre-sized output buffer
    pub fn new(address: impl Into<String>, initial_capacity: usize) -> Self {
        Self {
            address: address.into(),
            output: Mutex::new(OutputBuffer::with_capacity(initial_capacity)),
            write_pending: AtomicBool::new(false),
        }
    }

    /// Backend address string
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Queue an encoded frame: grow the buffer to fit, then copy the frame
    /// after any bytes already queued. All-or-nothing.
    pub fn enqueue(&self, frame: &[u8]) -> Result<()> {
        self.output.lock().append(frame)
    }

    /// Number of bytes currently queued for this server
    pub fn queued_bytes(&self) -> usize {
        self.output.lock().available()
    }

    /// Lock the output buffer for draining. The transport holds this guard
    /// across its peek-write-consume cycle so no append can interleave.
    pub fn output(&self) -> MutexGuard<'_, OutputBuffer> {
        self.output.lock()
    }

    /// Arm the write-pending flag. Returns `true` only on the unarmed→armed
    /// transition, i.e. when the caller should notify the transport.
    pub fn mark_write_pending(&self) -> bool {
        !self.write_pending.swap(true, Ordering::SeqCst)
    }

    /// Clear the write-pending flag after a drain pass. Called by the
    /// transport once it has drained this server's buffer and released the
    /// guard (this method locks the buffer to inspect it).
    ///
    /// Returns `true` when bytes are still queued: a dispatch landed after
    /// the drain but before this call, saw the flag armed, and sent no
    /// wakeup. In that case the latch stays armed and the caller must run
    /// another drain pass. Returns `false` once the buffer is empty and the
    /// latch is disarmed.
    pub fn clear_write_pending(&self) -> bool {
        self.write_pending.store(false, Ordering::SeqCst);
        if self.queued_bytes() == 0 {
            return false;
        }

        // Re-arm before reporting, so dispatches racing this call keep
        // deduplicating against the upcoming drain pass
        self.write_pending.store(true, Ordering::SeqCst);
        true
    }

    /// Whether the transport owes this server a drain pass
    pub fn write_pending(&self) -> bool {
        self.write_pending.load(Ordering::SeqCst)
    }
}
