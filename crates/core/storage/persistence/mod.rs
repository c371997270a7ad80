//! Persistence for the in-memory store.
//!
//! `SnapshotFile` writes point-in-time snapshots of every collection.

pub mod snapshot;

pub use snapshot::{SnapshotConfig, SnapshotData, SnapshotFile};
