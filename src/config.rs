//! Configuration for hivecache
//!
//! Centralized configuration with sensible defaults.

/// Main configuration for a hivecache client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Cluster Configuration
    // -------------------------------------------------------------------------
    /// Backend server addresses (host:port), index-aligned with the server
    /// indices in the vbucket table. Order matters.
    pub nodes: Vec<String>,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Initial capacity of each server's output buffer (in bytes). Buffers
    /// grow on demand; this only sets the starting allocation.
    pub initial_output_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes: vec!["127.0.0.1:11211".to_string()],
            initial_output_capacity: 4 * 1024, // 4 KiB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            // Start from an empty node list so `node()` calls are additive
            config: Config {
                nodes: Vec::new(),
                ..Config::default()
            },
        }
    }
}

impl ConfigBuilder {
    /// Add a single backend node address
    pub fn node(mut self, addr: impl Into<String>) -> Self {
        self.config.nodes.push(addr.into());
        self
    }

    /// Replace the full backend node list
    pub fn nodes<I, S>(mut self, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.nodes = addrs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initial per-server output buffer capacity (in bytes)
    pub fn initial_output_capacity(mut self, bytes: usize) -> Self {
        self.config.initial_output_capacity = bytes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
