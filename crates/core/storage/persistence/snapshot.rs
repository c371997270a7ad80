//! Snapshot-based persistence for Statboard.
//!
//! Provides point-in-time snapshot storage of every collection in the store.
//! Snapshots are written synchronously and atomically replace the previous snapshot.

use crate::error::{Result, StatsError};
use crate::storage::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SNAPSHOT_MAGIC: &[u8] = b"STATBOARD_SNAPSHOT";
const SNAPSHOT_VERSION: u8 = 1;
/// Magic, version byte, timestamp and payload length.
const HEADER_LEN: u64 = SNAPSHOT_MAGIC.len() as u64 + 1 + 16 + 8;

/// Collections in natural order, keyed by collection name.
pub type SnapshotData = BTreeMap<String, Vec<Document>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    /// Save automatically after this many writes
    #[serde(default)]
    pub auto_snapshot_ops: Option<usize>,
}

pub struct SnapshotFile {
    path: PathBuf,
    config: SnapshotConfig,
    ops_since_snapshot: usize,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P, config: SnapshotConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            ops_since_snapshot: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<SnapshotData> {
        if !self.exists() {
            return Ok(SnapshotData::new());
        }

        let file = File::open(&self.path)?;
        let metadata = file.metadata()?;
        if metadata.len() == 0 {
            return Ok(SnapshotData::new());
        }

        let mut reader = BufReader::new(file);

        let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(StatsError::InvalidFormat);
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != SNAPSHOT_VERSION {
            return Err(StatsError::InvalidFormat);
        }

        let mut timestamp_bytes = [0u8; 16];
        reader.read_exact(&mut timestamp_bytes)?;

        let payload_len = read_u64(&mut reader)?;
        if payload_len > metadata.len().saturating_sub(HEADER_LEN) {
            log::warn!(
                "Snapshot at {} declares {} payload bytes but is only {} bytes long",
                self.path.display(),
                payload_len,
                metadata.len()
            );
            return Err(StatsError::InvalidFormat);
        }
        let mut payload = vec![0u8; payload_len as usize];
        reader.read_exact(&mut payload)?;

        serde_json::from_slice(&payload).map_err(|e| {
            log::warn!("Snapshot payload at {} is corrupt: {}", self.path.display(), e);
            StatsError::InvalidFormat
        })
    }

    pub fn save(&mut self, data: &SnapshotData) -> Result<()> {
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StatsError::Other(format!("System clock before epoch: {}", e)))?;
        let mut timestamp_buf = [0u8; 16];
        timestamp_buf[0..8].copy_from_slice(&timestamp.as_secs().to_le_bytes());
        timestamp_buf[8..12].copy_from_slice(&timestamp.subsec_nanos().to_le_bytes());
        writer.write_all(&timestamp_buf)?;

        let payload = serde_json::to_vec(data)
            .map_err(|e| StatsError::Other(format!("Failed to encode snapshot: {}", e)))?;
        write_u64(&mut writer, payload.len() as u64)?;
        writer.write_all(&payload)?;

        writer.flush()?;
        writer.get_ref().sync_all()?;
        drop(writer);

        std::fs::rename(&temp_path, &self.path)?;
        self.ops_since_snapshot = 0;

        log::debug!(
            "Saved snapshot of {} collections to {}",
            data.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Count one write; returns true once an automatic snapshot is due.
    pub fn record_op(&mut self) -> bool {
        self.ops_since_snapshot += 1;
        self.config
            .auto_snapshot_ops
            .is_some_and(|threshold| self.ops_since_snapshot >= threshold)
    }

    pub fn ops_since_snapshot(&self) -> usize {
        self.ops_since_snapshot
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

fn write_u64<W: Write>(writer: &mut W, value: u64) -> Result<()> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
