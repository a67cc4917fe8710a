//! Configuration for taskdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a RecordStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the store file
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── db.json          (the whole store)
    ///     └── db.json.tmp      (only while a write is in flight)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// When snapshots reach disk relative to the mutating call
    pub persist_strategy: PersistStrategy,

    /// fsync the temp file before renaming it over the store file
    pub sync_on_write: bool,

    /// Write indented JSON instead of the compact form
    pub pretty: bool,
}

/// Persistence strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStrategy {
    /// Write the snapshot before the mutating call returns (safest)
    Immediate,

    /// Hand the snapshot to a writer thread; `flush()` waits for it
    Background,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./taskdb_data"),
            persist_strategy: PersistStrategy::Immediate,
            sync_on_write: true,
            pretty: false,
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
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (holds the store file)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the persistence strategy
    pub fn persist_strategy(mut self, strategy: PersistStrategy) -> Self {
        self.config.persist_strategy = strategy;
        self
    }

    /// Enable or disable fsync before rename
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.config.sync_on_write = sync;
        self
    }

    /// Enable or disable pretty-printed output
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
