//! Configuration for Statboard
//!
//! Settings that shape leaderboard queries and snapshot persistence. Loaded
//! from TOML with the `toml` feature, or built in code.

use crate::storage::SnapshotConfig;
use serde::{Deserialize, Serialize};

/// Default maximum number of records a leaderboard read returns.
pub const MAX_RECORDS: usize = 100;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Cap applied to every leaderboard read without a valid override key
    #[serde(default = "Config::default_max_records")]
    pub max_records: usize,

    /// Shared secret that lifts `max_records` when presented by a reader
    #[serde(default)]
    pub limit_override_key: Option<String>,

    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

impl Config {
    const fn default_max_records() -> usize {
        MAX_RECORDS
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        assert!(max_records > 0, "Record cap must be greater than zero");
        self.max_records = max_records;
        self
    }

    /// Sets the override secret. An empty key disables the override.
    pub fn with_limit_override_key<S: Into<String>>(mut self, key: Option<S>) -> Self {
        self.limit_override_key = key.map(Into::into).filter(|k| !k.is_empty());
        self
    }

    pub fn with_snapshot(mut self, snapshot: SnapshotConfig) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_records == 0 {
            return Err("Record cap must be greater than zero".to_string());
        }

        if self.snapshot.auto_snapshot_ops == Some(0) {
            return Err("Auto snapshot interval must be greater than zero".to_string());
        }

        Ok(())
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(input: &str) -> crate::Result<Self> {
        let mut config: Config =
            toml::from_str(input).map_err(|e| crate::StatsError::Other(e.to_string()))?;
        config.validate().map_err(crate::StatsError::Other)?;
        let key = config.limit_override_key.take();
        Ok(config.with_limit_override_key(key))
    }

    pub fn from_json_str(input: &str) -> crate::Result<Self> {
        let mut config: Config =
            serde_json::from_str(input).map_err(|e| crate::StatsError::Other(e.to_string()))?;
        config.validate().map_err(crate::StatsError::Other)?;
        let key = config.limit_override_key.take();
        Ok(config.with_limit_override_key(key))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_records: Self::default_max_records(),
            limit_override_key: None,
            snapshot: SnapshotConfig::default(),
        }
    }
}
