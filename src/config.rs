//! Configuration for caskkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CaskError, Result};

/// Main configuration for a caskkv store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// The single data file holding the log
    pub path: PathBuf,

    /// Create the data file if it does not exist yet
    pub create_if_missing: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: how often to fsync after appends
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Replay Configuration
    // -------------------------------------------------------------------------
    /// Read buffer capacity used while replaying the log (in bytes)
    pub replay_buffer_size: usize,
}

/// Sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Never fsync on set; the OS decides when to flush. Close still syncs.
    Never,

    /// fsync after every write (safest, slowest)
    EveryWrite,

    /// fsync after N appended records
    EveryNWrites { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./caskkv.db"),
            create_if_missing: true,
            sync_strategy: SyncStrategy::Never,
            replay_buffer_size: 64 * 1024, // 64 KB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config pointed at `path`
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if let SyncStrategy::EveryNWrites { count: 0 } = self.sync_strategy {
            return Err(CaskError::Config(
                "EveryNWrites requires a count greater than zero".to_string(),
            ));
        }

        if self.replay_buffer_size == 0 {
            return Err(CaskError::Config(
                "replay_buffer_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set whether a missing data file is created on open
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.config.create_if_missing = create;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the replay read buffer size (in bytes)
    pub fn replay_buffer_size(mut self, size: usize) -> Self {
        self.config.replay_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
