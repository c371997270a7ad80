//! Database builder for flexible configuration
//!
//! This module provides a builder pattern for creating databases with
//! snapshot persistence, a block classifier and custom limits.

use crate::compute::blocks::{AnyKey, BlockClassifier};
use crate::config::Config;
use crate::db::StatsDB;
use crate::error::Result;
use crate::storage::{DocumentStore, MemoryBackend};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for database configuration with snapshot paths and settings.
pub struct StatsDBBuilder {
    snapshot_path: Option<PathBuf>,
    config: Config,
    blocks: Arc<dyn BlockClassifier>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl StatsDBBuilder {
    /// Create a new builder with default in-memory configuration.
    pub fn new() -> Self {
        Self {
            snapshot_path: None,
            config: Config::default(),
            blocks: Arc::new(AnyKey),
            store: None,
        }
    }

    /// Persist the in-memory store to a snapshot file at this path.
    pub fn snapshot_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Configure for in-memory storage with no persistence.
    pub fn in_memory(mut self) -> Self {
        self.snapshot_path = None;
        self
    }

    /// Set the database configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Classifier deciding which `used` counters count as placed blocks.
    pub fn block_classifier(mut self, blocks: Arc<dyn BlockClassifier>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Use an externally constructed store; overrides `snapshot_path`.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the database.
    pub fn build(self) -> Result<StatsDB> {
        let store: Arc<dyn DocumentStore> = match (self.store, self.snapshot_path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(MemoryBackend::with_snapshot(
                path,
                self.config.snapshot.clone(),
            )?),
            (None, None) => Arc::new(MemoryBackend::new()),
        };

        Ok(StatsDB::with_store(store, &self.config).with_block_classifier(self.blocks))
    }
}

impl Default for StatsDBBuilder {
    fn default() -> Self {
        Self::new()
    }
}
