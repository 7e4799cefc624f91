//! # hivecache
//!
//! The request core of a client for a sharded key-value cache:
//! - vbucket-based key-to-server routing
//! - binary request-frame encoding with per-opcode layout
//! - per-server output buffering with FIFO enqueue order
//! - unique correlation tokens for response matching
//!
//! Socket I/O, response parsing and cluster configuration delivery live in
//! external subsystems; this crate defines the seams they plug into
//! ([`TableSource`], [`network::TransportNotifier`]).
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Cluster::store()                        │
//! │               (sole request entry point)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   VBucket Router                            │
//! │        key ──► vbucket id ──► owning server index           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │Frame Encoder│          │   Server    │
//!   │  (binary)   │─────────►│OutputBuffer │
//!   └─────────────┘  append  └──────┬──────┘
//!                                   │ drain
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Transport  │
//!                           │  (external) │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod vbucket;
pub mod protocol;
pub mod network;
pub mod cluster;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HiveError, Result};
pub use config::Config;
pub use cluster::{Cluster, TableSource};
pub use protocol::StoreOperation;
pub use vbucket::VBucketTable;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hivecache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
