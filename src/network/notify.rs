//! Write-readiness signalling
//!
//! The dispatcher tells the transport reactor which servers have queued
//! output; the reactor owns the sockets and does the actual writing.

use crossbeam::channel::{self, Receiver, Sender};

/// Sink for write-readiness signals, implemented by the transport layer.
///
/// `notify_write_ready` is fire-and-forget: it must not block, and the
/// dispatcher never waits for the transport to act. Correctness rests only
/// on enqueue order, not on when (or whether) the wakeup is serviced.
pub trait TransportNotifier: Send + Sync {
    /// A server (by index) has new bytes queued since it was last drained
    fn notify_write_ready(&self, server: usize);
}

/// Channel-backed notifier: pushes the index of each newly write-ready
/// server to the reactor that owns the receiving half.
pub struct ReadyQueue {
    tx: Sender<usize>,
}

impl ReadyQueue {
    /// Create the queue and the receiver the transport reactor will poll
    pub fn unbounded() -> (Self, Receiver<usize>) {
        let (tx, rx) = channel::unbounded();
        (Self { tx }, rx)
    }
}

impl TransportNotifier for ReadyQueue {
    fn notify_write_ready(&self, server: usize) {
        // A disconnected reactor just means nobody is listening right now;
        // the queued bytes stay in the buffer either way.
        let _ = self.tx.send(server);
    }
}
