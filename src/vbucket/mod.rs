//! VBucket Module
//!
//! Key-to-server partition routing.
//!
//! ## Responsibilities
//! - Hash a key to its vbucket (partition) id
//! - Look up the server that owns a vbucket
//! - Validate tables on construction, before any request routes against them
//!
//! ## Partitioning Scheme
//! The keyspace is divided into a fixed, power-of-two number of vbuckets.
//! A key's vbucket is a pure function of its bytes:
//!
//! ```text
//! vbucket = ((crc32(key) >> 16) & 0x7fff) & (vbucket_count - 1)
//! ```
//!
//! The vbucket-to-server assignment is the part that moves during a
//! rebalance; it arrives from the cluster configuration subsystem as a flat
//! map, one server index per vbucket, and is replaced wholesale on refresh.
//! A table is never mutated in place after construction.

mod table;

pub use table::{VBucketTable, MAX_VBUCKETS};
