//! Document store abstraction for Statboard
//!
//! This module provides a trait-based abstraction for the schemaless document
//! store player records live in, allowing different storage implementations
//! while maintaining a consistent API. Each logical collection is addressed
//! by name; one collection holds one server namespace.

use crate::error::Result;
use serde_json::{Map, Value};

mod memory;
mod path;
pub mod persistence;

pub use memory::MemoryBackend;
pub use path::{compare_values, lookup, project};
pub use persistence::{SnapshotConfig, SnapshotFile};

/// A stored document: a JSON object.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned document identifier.
pub const ID_FIELD: &str = "_id";

/// Trait for document store implementations
///
/// Methods take `&self`; implementations synchronize internally so a single
/// handle can be shared across concurrent requests.
pub trait DocumentStore: Send + Sync {
    /// Get the first document in natural order matching `filter`
    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    /// Get all documents matching `filter`, projected, sorted and limited
    fn find(&self, collection: &str, filter: &Filter, options: &FindOptions)
    -> Result<Vec<Document>>;

    /// Insert a document and return its assigned identifier
    fn insert_one(&self, collection: &str, document: Document) -> Result<String>;

    /// Set the top-level fields of `update` on the first document matching
    /// `filter`. Returns the number of documents matched (0 or 1).
    fn update_one(&self, collection: &str, filter: &Filter, update: Document) -> Result<u64>;

    /// Atomically replace the first document matching `filter` with
    /// `document`, or insert it if nothing matches. The identifier of an
    /// existing document is preserved. Returns the document identifier.
    fn replace_or_insert(&self, collection: &str, filter: &Filter, document: Document)
    -> Result<String>;

    /// Names of all collections holding at least one document
    fn collection_names(&self) -> Result<Vec<String>>;

    /// Get storage statistics
    fn stats(&self) -> Result<StorageStats>;

    /// Flush any pending writes to persistent storage
    fn sync(&self) -> Result<()>;

    /// Close the storage backend
    fn close(&self) -> Result<()>;
}

/// Conjunction of exact-match conditions on dotted field paths.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single-condition filter.
    pub fn by<P: Into<String>, V: Into<Value>>(path: P, value: V) -> Self {
        Self::new().and(path, value)
    }

    pub fn and<P: Into<String>, V: Into<Value>>(mut self, path: P, value: V) -> Self {
        self.conditions.push((path.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(path, expected)| lookup(document, path) == Some(expected))
    }
}

/// Sort order for a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Maps the store convention (`1` / `-1`); anything but `1` is descending.
    pub fn from_value(value: i32) -> Self {
        if value == 1 {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

/// Options for [`DocumentStore::find`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Dotted paths to keep; `None` returns whole documents
    pub projection: Option<Vec<String>>,
    /// Single sort key; `None` keeps natural (insertion) order
    pub sort: Option<(String, SortOrder)>,
    /// Maximum number of documents; `None` means unbounded
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(mut self, paths: Vec<String>) -> Self {
        self.projection = Some(paths);
        self
    }

    pub fn sort<P: Into<String>>(mut self, path: P, order: SortOrder) -> Self {
        self.sort = Some((path.into(), order));
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Storage backend statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of non-empty collections
    pub collection_count: usize,
    /// Total number of documents across collections
    pub document_count: usize,
    /// Number of write operations performed
    pub operations_count: u64,
}
