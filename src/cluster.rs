//! Cluster Module
//!
//! The client instance that coordinates all components.
//!
//! ## Responsibilities
//! - Hold the current vbucket table snapshot (replaced wholesale on refresh)
//! - Route each key through one consistent snapshot
//! - Issue unique correlation tokens
//! - Queue encoded frames and wake the transport

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::Config;
use crate::error::{HiveError, Result};
use crate::network::{Server, TransportNotifier};
use crate::protocol::{encode_request, StoreOperation, StoreRequest};
use crate::vbucket::VBucketTable;

/// Source of vbucket tables, implemented by the cluster-configuration
/// subsystem.
pub trait TableSource: Send + Sync {
    /// Produce a fresh table snapshot. May block on a synchronous fetch.
    fn fetch(&self) -> Result<VBucketTable>;
}

/// The client instance
///
/// ## Concurrency Model
///
/// - **Routing**: each dispatch clones the `Arc` snapshot once and performs
///   both lookups against it; a concurrent refresh swaps the slot but never
///   touches a published table.
/// - **Tokens**: one process-wide atomic counter; every dispatch takes the
///   next value, so tokens are unique for the instance's lifetime.
/// - **Buffers**: each server's output buffer sits behind its own mutex, so
///   appends to one server serialize (FIFO per connection) while appends to
///   different servers proceed independently.
pub struct Cluster {
    /// Client configuration
    config: Config,

    /// Per-backend connection state, index-aligned with the table's server
    /// indices
    servers: Vec<Server>,

    /// Current routing snapshot; `None` until the first table arrives
    table: RwLock<Option<Arc<VBucketTable>>>,

    /// Correlation-token counter; every dispatched frame takes the next value
    seqno: AtomicU32,

    /// External configuration hook consulted when no table is installed
    source: Option<Box<dyn TableSource>>,

    /// External transport hook for write-readiness wakeups
    notifier: Option<Box<dyn TransportNotifier>>,
}

impl Cluster {
    /// Create a client for the backends named in `config`.
    ///
    /// One `Server` is created per configured node, in order; the vbucket
    /// table's server indices refer to this list.
    pub fn new(config: Config) -> Self {
        let servers = config
            .nodes
            .iter()
            .map(|addr| Server::new(addr.clone(), config.initial_output_capacity))
            .collect();

        Self {
            config,
            servers,
            table: RwLock::new(None),
            seqno: AtomicU32::new(0),
            source: None,
            notifier: None,
        }
    }

    /// Attach the configuration source consulted when no table is installed
    pub fn with_table_source(mut self, source: impl TableSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the transport notifier that receives write-readiness wakeups
    pub fn with_notifier(mut self, notifier: impl TransportNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Install a table snapshot, replacing any previous one wholesale.
    ///
    /// Called by the external configuration subsystem on every refresh.
    /// Dispatches already routing against the old snapshot finish on it.
    pub fn apply_table(&self, table: VBucketTable) {
        tracing::debug!(
            "installing vbucket table: {} vbuckets across {} servers",
            table.vbucket_count(),
            table.server_count()
        );
        *self.table.write() = Some(Arc::new(table));
    }

    /// Get the current snapshot, fetching one through the table source if
    /// none is installed yet.
    ///
    /// The fetch runs under the slot's write lock, so concurrent first
    /// requests serialize on a single fetch. This is the only point where a
    /// dispatch may block.
    pub fn ensure_table(&self) -> Result<Arc<VBucketTable>> {
        if let Some(table) = self.table.read().as_ref() {
            return Ok(Arc::clone(table));
        }

        let mut slot = self.table.write();

        // Another dispatch may have fetched while we waited for the lock
        if let Some(table) = slot.as_ref() {
            return Ok(Arc::clone(table));
        }

        let source = self.source.as_ref().ok_or_else(|| {
            HiveError::ConfigUnavailable(
                "no table installed and no table source attached".to_string(),
            )
        })?;

        let table = Arc::new(source.fetch()?);
        tracing::debug!(
            "fetched vbucket table: {} vbuckets across {} servers",
            table.vbucket_count(),
            table.server_count()
        );
        *slot = Some(Arc::clone(&table));

        Ok(table)
    }

    /// Resolve the server that owns `key`'s vbucket.
    ///
    /// Deterministic and idempotent for a fixed snapshot: repeated calls
    /// with the same key return the same server.
    pub fn resolve(&self, key: &[u8]) -> Result<&Server> {
        let table = self.ensure_table()?;
        let (index, _vbucket) = self.route(&table, key)?;
        Ok(&self.servers[index])
    }

    /// Queue a store request for the server that owns `key`.
    ///
    /// Steps:
    /// 1. Ensure a table snapshot (may fetch through the table source)
    /// 2. Route the key through that one snapshot
    /// 3. Allocate the correlation token
    /// 4. Encode the frame
    /// 5. Grow the owning server's output buffer and append the frame
    /// 6. Wake the transport unless the server is already write-pending
    ///
    /// Returns the correlation token the response will carry. Success means
    /// the frame is durably queued, not acknowledged; transmission is
    /// asynchronous and handled by the external transport.
    ///
    /// `expiry` is transmitted verbatim: the server reads values up to
    /// 30 days as relative seconds and larger values as an absolute unix
    /// timestamp. `cas` of zero means unconditional.
    pub fn store(
        &self,
        operation: StoreOperation,
        key: &[u8],
        value: &[u8],
        flags: u32,
        expiry: u32,
        cas: u64,
    ) -> Result<u32> {
        // Step 1 + 2: one snapshot, both lookups
        let table = self.ensure_table()?;
        let (index, vbucket) = self.route(&table, key)?;

        // Step 3: fresh correlation token
        let opaque = self.next_opaque();

        // Step 4: pure encode; routing and token are fixed at this point
        let request = StoreRequest {
            operation,
            key,
            value,
            flags,
            expiry,
            cas,
        };
        let frame = encode_request(&request, vbucket, opaque)?;

        // Step 5: append to the owning server's buffer (all-or-nothing)
        let server = &self.servers[index];
        server.enqueue(&frame)?;

        // Step 6: at most one outstanding wakeup per server
        if server.mark_write_pending() {
            if let Some(notifier) = &self.notifier {
                notifier.notify_write_ready(index);
            }
        }

        tracing::trace!(
            "queued {:?} for vbucket {} on server {} ({} bytes, opaque {})",
            operation,
            vbucket,
            index,
            frame.len(),
            opaque
        );

        Ok(opaque)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The known servers, in table index order
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Server handle by table index
    pub fn server(&self, index: usize) -> Option<&Server> {
        self.servers.get(index)
    }

    /// Whether a table snapshot is currently installed
    pub fn has_table(&self) -> bool {
        self.table.read().is_some()
    }

    /// The most recently issued correlation token (0 before the first
    /// dispatch)
    pub fn last_opaque(&self) -> u32 {
        self.seqno.load(Ordering::SeqCst)
    }

    /// The configuration this client was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Both routing lookups against one snapshot. Returns the validated
    /// server index and the vbucket id.
    fn route(&self, table: &VBucketTable, key: &[u8]) -> Result<(usize, u16)> {
        let vbucket = table.vbucket_for(key);

        let server = table.server_index_for(vbucket).ok_or_else(|| {
            tracing::warn!("vbucket {} has no owning server, aborting request", vbucket);
            HiveError::UnassignedVBucket(vbucket)
        })?;

        let index = usize::from(server);
        if index >= self.servers.len() {
            tracing::warn!(
                "vbucket {} maps to server {} but only {} servers are known",
                vbucket,
                server,
                self.servers.len()
            );
            return Err(HiveError::UnknownServer {
                vbucket,
                server,
                known: self.servers.len(),
            });
        }

        Ok((index, vbucket))
    }

    /// Allocate the next correlation token. Strictly increasing across the
    /// instance's lifetime; the first token is 1.
    fn next_opaque(&self) -> u32 {
        self.seqno.fetch_add(1, Ordering::SeqCst).wrapping_add(1)
    }
}
