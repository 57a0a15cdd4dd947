//! Store registry: store id → shared triple store
//!
//! Each store id resolves to exactly one [`TripleStore`] for the lifetime of
//! the registry, created (and seeded with the default namespaces) on first
//! use. Stores with different ids never share quads or bindings.

use super::{ConjunctiveGraph, Graph, StoreError, StoreResult, TripleStore};
use crate::config::{ConfigError, StoreConfig};
use crate::persistence::{MemoryStorage, StorageBackend, StorageError};
use crate::rdf::GraphName;
use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::info;

/// Store id used when none is given
pub const DEFAULT_STORE_ID: &str = "default";

/// Registry of stores sharing one storage backend
pub struct StoreRegistry {
    backend: Arc<dyn StorageBackend>,
    default_store_id: String,
    stores: RwLock<FxHashMap<String, Arc<TripleStore>>>,
}

impl StoreRegistry {
    /// Create a registry over a backend
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self::with_default_store_id(backend, DEFAULT_STORE_ID)
    }

    pub fn with_default_store_id(
        backend: Arc<dyn StorageBackend>,
        default_store_id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            default_store_id: default_store_id.into(),
            stores: RwLock::new(FxHashMap::default()),
        }
    }

    /// Registry over a fresh in-memory backend
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Registry over the backend a configuration names
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        let backend = config.open_backend()?;
        Ok(Self::with_default_store_id(backend, config.default_store_id.clone()))
    }

    /// Process-wide registry on an in-memory backend
    pub fn global() -> &'static StoreRegistry {
        static GLOBAL: OnceLock<StoreRegistry> = OnceLock::new();
        GLOBAL.get_or_init(StoreRegistry::in_memory)
    }

    pub fn default_store_id(&self) -> &str {
        &self.default_store_id
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Resolve a store id, opening the store on first use
    pub fn open(&self, store_id: Option<&str>) -> StoreResult<Arc<TripleStore>> {
        let store_id = store_id.unwrap_or(&self.default_store_id);

        if let Some(store) = self.read_stores()?.get(store_id) {
            return Ok(Arc::clone(store));
        }

        let mut stores = self.stores.write().map_err(|_| poisoned())?;
        // Another caller may have opened it between the two locks
        if let Some(store) = stores.get(store_id) {
            return Ok(Arc::clone(store));
        }

        let store = Arc::new(TripleStore::open(store_id, Arc::clone(&self.backend))?);
        stores.insert(store_id.to_string(), Arc::clone(&store));
        info!("Registered store: {}", store_id);

        Ok(store)
    }

    /// Context view over `identifier` in the given store
    pub fn get_named_graph(
        &self,
        identifier: impl Into<GraphName>,
        store_id: Option<&str>,
    ) -> StoreResult<Graph> {
        Ok(Graph::new(self.open(store_id)?, identifier))
    }

    /// Conjunctive view over the given store; `identifier` names the context
    /// that receives its writes
    pub fn get_conjunctive_graph(
        &self,
        store_id: Option<&str>,
        identifier: Option<GraphName>,
    ) -> StoreResult<ConjunctiveGraph> {
        let store = self.open(store_id)?;
        Ok(match identifier {
            Some(identifier) => ConjunctiveGraph::with_identifier(store, identifier),
            None => ConjunctiveGraph::new(store),
        })
    }

    /// Ids of the stores opened so far
    pub fn store_ids(&self) -> StoreResult<Vec<String>> {
        let mut ids: Vec<String> = self.read_stores()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn read_stores(
        &self,
    ) -> StoreResult<std::sync::RwLockReadGuard<'_, FxHashMap<String, Arc<TripleStore>>>> {
        self.stores.read().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::StorageUnavailable(StorageError::Unavailable(
        "store registry lock poisoned".to_string(),
    ))
}

/// Context view from the process-wide registry
pub fn get_named_graph(identifier: impl Into<GraphName>, store_id: Option<&str>) -> StoreResult<Graph> {
    StoreRegistry::global().get_named_graph(identifier, store_id)
}

/// Conjunctive view from the process-wide registry
pub fn get_conjunctive_graph(
    store_id: Option<&str>,
    identifier: Option<GraphName>,
) -> StoreResult<ConjunctiveGraph> {
    StoreRegistry::global().get_conjunctive_graph(store_id, identifier)
}
