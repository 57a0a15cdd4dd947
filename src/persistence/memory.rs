//! In-memory storage backend
//!
//! One [`QuadIndex`] and one namespace table per store id. Nothing survives
//! the process.

use super::{NamespaceRecord, StorageBackend, StorageError, StorageResult};
use crate::rdf::{GraphName, Quad, QuadPattern};
use crate::store::index::QuadIndex;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

#[derive(Debug, Default)]
struct StoreTables {
    quads: QuadIndex,
    /// Prefix → record, insertion ordered
    namespaces: IndexMap<String, NamespaceRecord>,
}

/// Process-local backend
#[derive(Debug, Default)]
pub struct MemoryStorage {
    stores: RwLock<FxHashMap<String, StoreTables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, FxHashMap<String, StoreTables>>> {
        self.stores
            .read()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, FxHashMap<String, StoreTables>>> {
        self.stores
            .write()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn insert(&self, store: &str, quads: &[Quad]) -> StorageResult<usize> {
        let mut stores = self.write()?;
        let tables = stores.entry(store.to_string()).or_default();

        let inserted = quads
            .iter()
            .filter(|quad| tables.quads.insert((*quad).clone()))
            .count();

        debug!("Inserted {} of {} quads into store {}", inserted, quads.len(), store);
        Ok(inserted)
    }

    fn delete(&self, store: &str, pattern: &QuadPattern) -> StorageResult<usize> {
        let mut stores = self.write()?;
        let removed = match stores.get_mut(store) {
            Some(tables) => tables.quads.remove_matching(pattern),
            None => 0,
        };

        debug!("Deleted {} quads from store {}", removed, store);
        Ok(removed)
    }

    fn scan(&self, store: &str, pattern: &QuadPattern) -> StorageResult<Vec<Quad>> {
        let stores = self.read()?;
        Ok(stores
            .get(store)
            .map(|tables| tables.quads.matching(pattern).cloned().collect())
            .unwrap_or_default())
    }

    fn count(&self, store: &str, pattern: &QuadPattern) -> StorageResult<usize> {
        let stores = self.read()?;
        Ok(stores.get(store).map_or(0, |tables| tables.quads.count(pattern)))
    }

    fn graphs(&self, store: &str) -> StorageResult<Vec<GraphName>> {
        let stores = self.read()?;
        Ok(stores
            .get(store)
            .map(|tables| tables.quads.graphs().cloned().collect())
            .unwrap_or_default())
    }

    fn put_namespace(&self, store: &str, record: &NamespaceRecord) -> StorageResult<()> {
        let mut stores = self.write()?;
        stores
            .entry(store.to_string())
            .or_default()
            .namespaces
            .insert(record.prefix.clone(), record.clone());
        Ok(())
    }

    fn delete_namespace(&self, store: &str, prefix: &str) -> StorageResult<()> {
        let mut stores = self.write()?;
        if let Some(tables) = stores.get_mut(store) {
            tables.namespaces.shift_remove(prefix);
        }
        Ok(())
    }

    fn namespaces(&self, store: &str) -> StorageResult<Vec<NamespaceRecord>> {
        let stores = self.read()?;
        Ok(stores
            .get(store)
            .map(|tables| tables.namespaces.values().cloned().collect())
            .unwrap_or_default())
    }
}
