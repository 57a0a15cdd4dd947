//! Storage backends for the quad store
//!
//! A backend is the durable keyed-record facility underneath every store:
//! - quads keyed by (store, context, subject, predicate, object), inserted
//!   idempotently and deleted, scanned or counted by partial key
//! - namespace bindings keyed by (store, prefix)
//!
//! Every call is atomic with respect to the records it touches. Failures are
//! reported as [`StorageError`] and never retried here.

pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod storage;

pub use memory::MemoryStorage;
#[cfg(feature = "rocksdb")]
pub use storage::PersistentStorage;

use crate::rdf::{GraphName, Quad, QuadPattern};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// RocksDB error
    #[cfg(feature = "rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// Column family error
    #[error("Column family error: {0}")]
    ColumnFamily(String),

    /// A stored record no longer decodes into valid terms
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The backend cannot serve requests (poisoned lock, closed handle)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persisted namespace binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceRecord {
    pub prefix: String,
    pub iri: String,
    /// Seeded default bindings are fixed and never rebound
    pub fixed: bool,
}

impl NamespaceRecord {
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>, fixed: bool) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
            fixed,
        }
    }
}

/// Quad-keyed storage contract
pub trait StorageBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Insert quads, skipping those already present. Returns how many were new.
    fn insert(&self, store: &str, quads: &[Quad]) -> StorageResult<usize>;

    /// Delete every quad matching the pattern. Returns how many were deleted.
    fn delete(&self, store: &str, pattern: &QuadPattern) -> StorageResult<usize>;

    /// All quads matching the pattern, in no particular order
    fn scan(&self, store: &str, pattern: &QuadPattern) -> StorageResult<Vec<Quad>>;

    /// Number of quads matching the pattern
    fn count(&self, store: &str, pattern: &QuadPattern) -> StorageResult<usize> {
        Ok(self.scan(store, pattern)?.len())
    }

    /// Distinct contexts that currently hold at least one quad
    fn graphs(&self, store: &str) -> StorageResult<Vec<GraphName>>;

    /// Upsert a namespace record by prefix
    fn put_namespace(&self, store: &str, record: &NamespaceRecord) -> StorageResult<()>;

    /// Drop the binding for a prefix, if any
    fn delete_namespace(&self, store: &str, prefix: &str) -> StorageResult<()>;

    /// Namespace records of a store, in a stable order
    fn namespaces(&self, store: &str) -> StorageResult<Vec<NamespaceRecord>>;
}
