//! In-memory document store implementation.

use super::persistence::{SnapshotConfig, SnapshotData, SnapshotFile};
use super::{
    DocumentStore, Document, Filter, FindOptions, ID_FIELD, SortOrder, StorageStats,
    compare_values, lookup, project,
};
use crate::error::Result;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Documents of one collection in insertion order.
#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
}

impl Collection {
    fn position(&self, filter: &Filter) -> Option<usize> {
        self.documents.iter().position(|doc| filter.matches(doc))
    }
}

/// In-memory document store using DashMap
///
/// Each collection sits behind its own shard lock, so a write to one
/// collection is atomic with respect to every other access to it. With a
/// snapshot path the store is loaded at open and saved on `sync`, `close`,
/// drop, and every `auto_snapshot_ops` writes.
pub struct MemoryBackend {
    collections: DashMap<String, Collection>,
    snapshot: Mutex<Option<SnapshotFile>>,
    operations_count: AtomicU64,
}

impl MemoryBackend {
    /// Create a new in-memory document store
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            snapshot: Mutex::new(None),
            operations_count: AtomicU64::new(0),
        }
    }

    /// Open a store backed by a snapshot file, loading it if present.
    pub fn with_snapshot<P: AsRef<Path>>(path: P, config: SnapshotConfig) -> Result<Self> {
        let file = SnapshotFile::new(path, config);
        let data = file.load()?;

        let backend = Self::new();
        let mut restored = 0usize;
        for (name, documents) in data {
            restored += documents.len();
            backend.collections.insert(name, Collection { documents });
        }

        log::debug!(
            "Restored {} documents from snapshot {}",
            restored,
            file.path().display()
        );

        *backend.snapshot.lock() = Some(file);
        Ok(backend)
    }

    /// Copy of every non-empty collection.
    pub fn export(&self) -> SnapshotData {
        self.collections
            .iter()
            .filter(|entry| !entry.documents.is_empty())
            .map(|entry| (entry.key().clone(), entry.documents.clone()))
            .collect()
    }

    fn assign_id(document: &mut Document) -> String {
        match document.get(ID_FIELD).and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        }
    }

    /// Book-keeping after a write. Must not be called while holding a
    /// collection guard: saving a snapshot reads every collection.
    fn record_write(&self) -> Result<()> {
        self.operations_count.fetch_add(1, Ordering::Relaxed);

        let mut snapshot = self.snapshot.lock();
        if let Some(file) = snapshot.as_mut() {
            if file.record_op() {
                file.save(&self.export())?;
            }
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryBackend {
    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.collections.get(collection).and_then(|c| {
            c.documents
                .iter()
                .find(|doc| filter.matches(doc))
                .cloned()
        }))
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let Some(c) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Document> = c
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .collect();

        if let Some((path, order)) = &options.sort {
            // stable: ties keep natural order
            matched.sort_by(|a, b| {
                let ordering = compare_values(lookup(a, path), lookup(b, path));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        let results = matched
            .into_iter()
            .take(limit)
            .map(|doc| match &options.projection {
                Some(paths) => project(doc, paths),
                None => doc.clone(),
            })
            .collect();

        Ok(results)
    }

    fn insert_one(&self, collection: &str, mut document: Document) -> Result<String> {
        let id = Self::assign_id(&mut document);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .documents
            .push(document);

        self.record_write()?;
        Ok(id)
    }

    fn update_one(&self, collection: &str, filter: &Filter, update: Document) -> Result<u64> {
        let matched = {
            let Some(mut c) = self.collections.get_mut(collection) else {
                return Ok(0);
            };
            match c.position(filter) {
                Some(index) => {
                    let target = &mut c.documents[index];
                    for (field, value) in update {
                        if field != ID_FIELD {
                            target.insert(field, value);
                        }
                    }
                    1
                }
                None => 0,
            }
        };

        if matched > 0 {
            self.record_write()?;
        }
        Ok(matched)
    }

    fn replace_or_insert(
        &self,
        collection: &str,
        filter: &Filter,
        mut document: Document,
    ) -> Result<String> {
        let id = {
            let mut c = self.collections.entry(collection.to_string()).or_default();
            match c.position(filter) {
                Some(index) => {
                    let existing = &mut c.documents[index];
                    let id = existing
                        .get(ID_FIELD)
                        .cloned()
                        .unwrap_or_else(|| Value::String(uuid::Uuid::new_v4().to_string()));
                    document.insert(ID_FIELD.to_string(), id.clone());
                    *existing = document;
                    id.as_str().map(str::to_string).unwrap_or_else(|| id.to_string())
                }
                None => {
                    document.remove(ID_FIELD);
                    let id = Self::assign_id(&mut document);
                    c.documents.push(document);
                    id
                }
            }
        };

        self.record_write()?;
        Ok(id)
    }

    fn collection_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|entry| !entry.documents.is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn stats(&self) -> Result<StorageStats> {
        let mut stats = StorageStats {
            operations_count: self.operations_count.load(Ordering::Relaxed),
            ..StorageStats::default()
        };
        for entry in self.collections.iter() {
            if !entry.documents.is_empty() {
                stats.collection_count += 1;
                stats.document_count += entry.documents.len();
            }
        }
        Ok(stats)
    }

    fn sync(&self) -> Result<()> {
        let mut snapshot = self.snapshot.lock();
        if let Some(file) = snapshot.as_mut() {
            file.save(&self.export())?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.sync()?;
        // closed stores are not saved again on drop
        self.snapshot.lock().take();
        self.collections.clear();
        Ok(())
    }
}

impl Drop for MemoryBackend {
    fn drop(&mut self) {
        if self.snapshot.get_mut().is_none() {
            return;
        }
        let data = self.export();
        if let Some(file) = self.snapshot.get_mut().as_mut() {
            if let Err(e) = file.save(&data) {
                log::warn!("Failed to save snapshot on drop: {}", e);
            }
        }
    }
}
