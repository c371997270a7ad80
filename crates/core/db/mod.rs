//! Core database implementation for Statboard.
//!
//! This module defines the `StatsDB` handle that ties normalization, query
//! building and the document store together into the read and write paths.

use crate::builder::StatsDBBuilder;
use crate::compute::aggregate::{Normalized, normalize};
use crate::compute::blocks::{AnyKey, BlockClassifier};
use crate::compute::query::{LeaderboardQuery, QueryLimits, build_query};
use crate::compute::validation::collection_name;
use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::storage::{
    Document, DocumentStore, Filter, ID_FIELD, MemoryBackend, StorageStats,
};
use serde_json::Value;
use statboard_types::player::PlayerRecord;
use statboard_types::request::{LeaderboardRequest, ServerIdentifier, UpdatePlayerRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Player statistics database.
///
/// Cheap to clone; clones share the same store. Built once per process and
/// handed to every request handler.
#[derive(Clone)]
pub struct StatsDB {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) blocks: Arc<dyn BlockClassifier>,
    pub(crate) limits: QueryLimits,
    pub(crate) closed: Arc<AtomicBool>,
}

impl StatsDB {
    pub fn builder() -> StatsDBBuilder {
        StatsDBBuilder::new()
    }

    /// Create an in-memory database with default configuration.
    pub fn memory() -> Self {
        Self::with_store(Arc::new(MemoryBackend::new()), &Config::default())
    }

    /// Wrap an existing store.
    pub fn with_store(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self {
            store,
            blocks: Arc::new(AnyKey),
            limits: QueryLimits::from_config(config),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_block_classifier(mut self, blocks: Arc<dyn BlockClassifier>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StatsError::DatabaseClosed);
        }
        Ok(())
    }

    /// Run a leaderboard read.
    ///
    /// An empty result is reported as [`StatsError::NotFound`], distinct
    /// from a store failure.
    pub fn leaderboard(&self, request: &LeaderboardRequest) -> Result<Vec<Document>> {
        self.ensure_open()?;

        let collection = collection_name(&request.server)?;
        let LeaderboardQuery { filter, options } = build_query(request, &self.limits);

        log::debug!(
            "Leaderboard query on {}: filter={:?} sort={:?} limit={:?}",
            collection,
            filter,
            options.sort,
            options.limit
        );

        let results = self.store.find(&collection, &filter, &options)?;
        if results.is_empty() {
            return Err(StatsError::NotFound);
        }
        Ok(results)
    }

    /// Replace a player's stats and advancements, creating the player if
    /// needed, and return the record as stored.
    ///
    /// The whole record is written in one conditional upsert keyed by UUID,
    /// so repeating a write leaves exactly one record.
    pub fn upsert_player(&self, request: UpdatePlayerRequest) -> Result<PlayerRecord> {
        self.ensure_open()?;

        let collection = collection_name(&request.server)?;
        if request.uuid.is_empty() {
            return Err(StatsError::InvalidInput("Player UUID cannot be empty".into()));
        }

        let Normalized {
            stats,
            advancements,
        } = normalize(request.stats, &request.advancements, self.blocks.as_ref());

        let record = PlayerRecord {
            id: String::new(),
            uuid: request.uuid,
            name: request.name,
            stats,
            advancements,
        };

        let document = to_document(&record)?;
        let id = self
            .store
            .replace_or_insert(&collection, &Filter::by("uuid", record.uuid.as_str()), document)?;

        log::debug!("Upserted player {} in {} as {}", record.uuid, collection, id);

        // the persisted form is what callers get back
        let stored = self
            .store
            .find_one(&collection, &Filter::by(ID_FIELD, id.as_str()))?
            .ok_or_else(|| {
                StatsError::Store(format!("Player {} missing from {} after write", id, collection))
            })?;

        from_document(stored)
    }

    /// Fetch one player's full record.
    pub fn get_player(&self, server: &ServerIdentifier, uuid: &str) -> Result<Option<PlayerRecord>> {
        self.ensure_open()?;

        let collection = collection_name(server)?;
        self.store
            .find_one(&collection, &Filter::by("uuid", uuid))?
            .map(from_document)
            .transpose()
    }

    pub fn stats(&self) -> Result<StorageStats> {
        self.store.stats()
    }

    /// Flush the store to persistent storage, if it has any.
    pub fn sync(&self) -> Result<()> {
        self.ensure_open()?;
        self.store.sync()
    }

    /// Close the database. Later calls fail with `DatabaseClosed`.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.store.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

fn to_document(record: &PlayerRecord) -> Result<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(StatsError::Other(format!(
            "Player record encoded as {} instead of an object",
            other
        ))),
        Err(e) => Err(StatsError::Other(format!("Failed to encode player: {}", e))),
    }
}

/// Stored documents that fail to decode are a server-side fault, never a
/// client input error.
fn from_document(document: Document) -> Result<PlayerRecord> {
    serde_json::from_value(Value::Object(document))
        .map_err(|e| StatsError::Store(format!("Stored player is malformed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use statboard_types::player::AdvancementInput;
    use statboard_types::stats::{Counter, StatGroup, StatsDocument};

    fn write(uuid: &str, name: &str) -> UpdatePlayerRequest {
        let mut stats = StatsDocument::scaffold();
        stats.group_mut(StatGroup::Mined).insert("minecraft:stone", 4);
        UpdatePlayerRequest {
            server: ServerIdentifier::new("s1", 1),
            uuid: uuid.into(),
            name: name.into(),
            stats,
            advancements: vec![AdvancementInput::new("a1", true)],
        }
    }

    #[test]
    fn test_upsert_returns_persisted_record() {
        let db = StatsDB::memory();
        let record = db.upsert_player(write("u1", "Bob")).unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.uuid, "u1");
        assert_eq!(
            record.stats.group(StatGroup::Totals).get("blocks_broken"),
            Some(Counter(4))
        );
    }

    #[test]
    fn test_empty_uuid_is_client_error() {
        let db = StatsDB::memory();
        let err = db.upsert_player(write("", "Bob")).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_closed_db_rejects_calls() {
        let db = StatsDB::memory();
        db.close().unwrap();
        assert!(db.is_closed());
        assert!(matches!(
            db.upsert_player(write("u1", "Bob")),
            Err(StatsError::DatabaseClosed)
        ));
        assert!(matches!(
            db.leaderboard(&LeaderboardRequest::default()),
            Err(StatsError::DatabaseClosed)
        ));
    }

    #[test]
    fn test_get_player() {
        let db = StatsDB::memory();
        let server = ServerIdentifier::new("s1", 1);
        assert!(db.get_player(&server, "u1").unwrap().is_none());

        db.upsert_player(write("u1", "Bob")).unwrap();
        let record = db.get_player(&server, "u1").unwrap().unwrap();
        assert_eq!(record.name, "Bob");
    }
}
