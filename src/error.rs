//! Error types for hivecache
//!
//! Provides a unified error type for all operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using HiveError
pub type Result<T> = std::result::Result<T, HiveError>;

/// Unified error type for hivecache operations
#[derive(Debug, Error)]
pub enum HiveError {
    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    /// No vbucket table could be obtained. Recoverable: retry once the
    /// configuration subsystem has delivered a snapshot.
    #[error("cluster configuration unavailable: {0}")]
    ConfigUnavailable(String),

    /// A vbucket has no owning server in the current table. The request is
    /// aborted; it is never re-routed to a default server.
    #[error("vbucket {0} has no owning server in the current table")]
    UnassignedVBucket(u16),

    /// The table names a server index beyond the servers this client knows.
    /// Indicates a corrupt or partial refresh.
    #[error("vbucket {vbucket} is owned by server {server}, but only {known} servers are known")]
    UnknownServer {
        vbucket: u16,
        server: u16,
        known: usize,
    },

    /// A vbucket table failed construction-time validation.
    #[error("invalid vbucket table: {0}")]
    InvalidTable(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    /// The key does not fit the 16-bit key-length field.
    #[error("key of {len} bytes exceeds the {max}-byte wire limit")]
    KeyTooLong { len: usize, max: usize },

    /// The request body does not fit the 32-bit body-length field (or the
    /// sanity cap below it).
    #[error("request body of {len} bytes exceeds the {max}-byte wire limit")]
    BodyTooLarge { len: u64, max: u32 },

    /// A byte sequence could not be decoded as a request frame.
    #[error("malformed frame: {0}")]
    Frame(String),

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    /// Output-buffer growth failed. The buffer is unchanged; nothing was
    /// partially appended.
    #[error("output buffer allocation failed: {0}")]
    OutOfMemory(#[from] TryReserveError),
}
