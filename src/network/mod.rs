//! Network Module
//!
//! Client-side state for each backend server and the transport boundary.
//!
//! ## Architecture
//! - One `Server` per backend, exclusively owning its output buffer
//! - The dispatcher appends encoded frames at the buffer's tail
//! - An external reactor drains from the head and writes to the socket
//! - A `ReadyQueue` carries write-readiness wakeups to that reactor
//!
//! The buffer mutex is the only synchronization between the two roles:
//! whoever holds it, dispatcher appending or reactor draining, has the
//! buffer to itself.

mod buffer;
mod notify;
mod server;

pub use buffer::OutputBuffer;
pub use notify::{ReadyQueue, TransportNotifier};
pub use server::Server;
