//! VBucket table implementation
//!
//! An immutable snapshot of the vbucket-to-server assignment.

use crate::error::{HiveError, Result};

/// The CRC32 digest is folded to 15 bits before masking, so a table can
/// usefully address at most 2^15 vbuckets.
pub const MAX_VBUCKETS: usize = 32_768;

/// An immutable routing snapshot: vbucket id per key, server index per
/// vbucket id.
///
/// Both lookups on one snapshot are consistent by construction; a
/// configuration refresh builds a new table and swaps it in, it never edits
/// a table that requests may be routing against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VBucketTable {
    /// Number of servers this table assigns vbuckets across
    server_count: u16,

    /// Owning server index per vbucket; a negative entry means the vbucket
    /// is currently unassigned (seen mid-rebalance or in a partial refresh)
    map: Vec<i32>,

    /// `map.len() - 1`; valid because the length is a power of two
    mask: u32,
}

impl VBucketTable {
    /// Build a table from a server count and a flat vbucket map.
    ///
    /// Validation (all construction-time, so lookups stay infallible apart
    /// from the unassigned case):
    /// - `server_count` must be non-zero
    /// - the map must contain at least one entry and at most [`MAX_VBUCKETS`]
    /// - the map length must be a power of two (the hash is mask-based)
    /// - every non-negative entry must be `< server_count`
    pub fn new(server_count: u16, map: Vec<i32>) -> Result<Self> {
        if server_count == 0 {
            return Err(HiveError::InvalidTable(
                "server count must be non-zero".to_string(),
            ));
        }
        if map.is_empty() {
            return Err(HiveError::InvalidTable(
                "vbucket map is empty".to_string(),
            ));
        }
        if map.len() > MAX_VBUCKETS {
            return Err(HiveError::InvalidTable(format!(
                "vbucket map has {} entries (max {})",
                map.len(),
                MAX_VBUCKETS
            )));
        }
        if !map.len().is_power_of_two() {
            return Err(HiveError::InvalidTable(format!(
                "vbucket count {} is not a power of two",
                map.len()
            )));
        }
        for (vb, &entry) in map.iter().enumerate() {
            if entry >= i32::from(server_count) {
                return Err(HiveError::InvalidTable(format!(
                    "vbucket {} maps to server {} but the table has {} servers",
                    vb, entry, server_count
                )));
            }
        }

        let mask = (map.len() - 1) as u32;
        Ok(Self {
            server_count,
            map,
            mask,
        })
    }

    /// Build a fully assigned table that spreads vbuckets round-robin across
    /// `server_count` servers. Handy for single-node setups and tests; real
    /// deployments receive their map from the configuration subsystem.
    pub fn uniform(server_count: u16, vbuckets: usize) -> Result<Self> {
        if server_count == 0 {
            return Err(HiveError::InvalidTable(
                "server count must be non-zero".to_string(),
            ));
        }
        let map = (0..vbuckets)
            .map(|vb| (vb % usize::from(server_count)) as i32)
            .collect();
        Self::new(server_count, map)
    }

    /// Compute the vbucket id for a key.
    ///
    /// Pure function of the key bytes: CRC32, folded to 15 bits, masked by
    /// the vbucket count. Deterministic for the lifetime of the snapshot.
    pub fn vbucket_for(&self, key: &[u8]) -> u16 {
        let digest = crc32fast::hash(key);
        (((digest >> 16) & 0x7fff) & self.mask) as u16
    }

    /// Look up the server index that owns a vbucket.
    ///
    /// Returns `None` when the vbucket is unassigned (negative map entry) or
    /// the id is outside this table. Callers treat `None` as a
    /// configuration-consistency failure and abort the request.
    pub fn server_index_for(&self, vbucket: u16) -> Option<u16> {
        match self.map.get(usize::from(vbucket)) {
            Some(&entry) if entry >= 0 => Some(entry as u16),
            _ => None,
        }
    }

    /// Number of vbuckets in this table
    pub fn vbucket_count(&self) -> usize {
        self.map.len()
    }

    /// Number of servers this table assigns vbuckets across
    pub fn server_count(&self) -> u16 {
        self.server_count
    }
}
