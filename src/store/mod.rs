//! Quad store engine, graph views and the store registry
//!
//! - [`TripleStore`]: every quad and namespace binding of one store id
//! - [`Graph`]: one context of a store
//! - [`ConjunctiveGraph`]: the union of all contexts of a store
//! - [`StoreRegistry`]: store id → shared [`TripleStore`]

mod graph;
pub mod index;
mod namespace;
mod registry;

pub use graph::{ConjunctiveGraph, Graph};
pub use namespace::NamespaceManager;
pub use registry::{get_conjunctive_graph, get_named_graph, StoreRegistry, DEFAULT_STORE_ID};

use crate::persistence::{NamespaceRecord, StorageBackend, StorageError};
use crate::rdf::{
    GraphName, GraphScope, Namespace, NamedNode, PatternError, Quad, QuadPattern, RdfError,
    Triple, TriplePattern, DEFAULT_NAMESPACES,
};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info};

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The storage backend failed or could not be reached
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(StorageError),

    /// A stored record was read back but no longer decodes
    #[error("Corrupt store data: {0}")]
    Corrupt(StorageError),

    /// Pattern rejected before reaching storage
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] PatternError),

    /// Term could not be built or decoded
    #[error("Invalid term: {0}")]
    InvalidTerm(#[from] RdfError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Corrupt(_) | StorageError::Serialization(_) => StoreError::Corrupt(err),
            other => StoreError::StorageUnavailable(other),
        }
    }
}

/// Iterator over triples, context dropped
pub struct TripleIterator {
    quads: std::vec::IntoIter<Quad>,
}

impl Iterator for TripleIterator {
    type Item = Triple;

    fn next(&mut self) -> Option<Self::Item> {
        self.quads.next().map(Quad::into_triple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.quads.size_hint()
    }
}

impl ExactSizeIterator for TripleIterator {}

/// Iterator over quads
pub struct QuadIterator {
    quads: std::vec::IntoIter<Quad>,
}

impl Iterator for QuadIterator {
    type Item = Quad;

    fn next(&mut self) -> Option<Self::Item> {
        self.quads.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.quads.size_hint()
    }
}

impl ExactSizeIterator for QuadIterator {}

/// Triple store engine for one store id
///
/// All views over the same store id share one `TripleStore`. Mutations are
/// serialized through a store-wide lock; reads see every completed write.
pub struct TripleStore {
    id: String,
    backend: Arc<dyn StorageBackend>,
    write_lock: Mutex<()>,
}

impl TripleStore {
    /// Open a store on a backend, seeding the default namespaces
    pub fn open(id: impl Into<String>, backend: Arc<dyn StorageBackend>) -> StoreResult<Self> {
        let store = Self {
            id: id.into(),
            backend,
            write_lock: Mutex::new(()),
        };
        store.seed_default_namespaces()?;

        info!("Opened store {} on {} backend", store.id, store.backend.name());
        Ok(store)
    }

    /// Store identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a triple to a context. Returns false if the quad already existed.
    pub fn add(&self, graph_name: &GraphName, triple: &Triple) -> StoreResult<bool> {
        let quad = triple.clone().in_graph(graph_name.clone());
        Ok(self.add_quads(std::iter::once(quad))? == 1)
    }

    /// Add quads in one atomic call. Returns how many were new.
    pub fn add_quads(&self, quads: impl IntoIterator<Item = Quad>) -> StoreResult<usize> {
        let quads: Vec<Quad> = quads.into_iter().collect();
        if quads.is_empty() {
            return Ok(0);
        }

        let _guard = self.lock()?;
        let inserted = self.backend.insert(&self.id, &quads)?;
        debug!("Store {}: added {} quads", self.id, inserted);
        Ok(inserted)
    }

    /// Remove every quad matching the pattern within the scope
    pub fn remove(&self, scope: &GraphScope, pattern: &TriplePattern) -> StoreResult<usize> {
        let quad_pattern = QuadPattern::new(scope.clone(), pattern.clone());

        let _guard = self.lock()?;
        let removed = self.backend.delete(&self.id, &quad_pattern)?;
        debug!("Store {}: removed {} quads from {:?}", self.id, removed, scope);
        Ok(removed)
    }

    /// Empty a scope; `GraphScope::All` empties the whole store
    pub fn clear(&self, scope: &GraphScope) -> StoreResult<usize> {
        let removed = self.remove(scope, &TriplePattern::any())?;
        info!("Store {}: cleared {} quads", self.id, removed);
        Ok(removed)
    }

    /// Triples matching the pattern within the scope.
    ///
    /// Every call re-scans storage and returns a snapshot taken at call time:
    /// all matches are collected before the iterator is handed out, so later
    /// writes never show up in it and a whole-store scan holds every match in
    /// memory.
    pub fn triples(&self, scope: &GraphScope, pattern: &TriplePattern) -> StoreResult<TripleIterator> {
        Ok(TripleIterator {
            quads: self.scan(scope, pattern)?.into_iter(),
        })
    }

    /// Quads matching the pattern within the scope, snapshotted like [`Self::triples`]
    pub fn quads(&self, scope: &GraphScope, pattern: &TriplePattern) -> StoreResult<QuadIterator> {
        Ok(QuadIterator {
            quads: self.scan(scope, pattern)?.into_iter(),
        })
    }

    /// Number of matching quads
    pub fn count(&self, scope: &GraphScope, pattern: &TriplePattern) -> StoreResult<usize> {
        let quad_pattern = QuadPattern::new(scope.clone(), pattern.clone());
        Ok(self.backend.count(&self.id, &quad_pattern)?)
    }

    /// Contexts currently holding at least one quad
    pub fn contexts(&self) -> StoreResult<impl Iterator<Item = GraphName>> {
        Ok(self.backend.graphs(&self.id)?.into_iter())
    }

    /// Bind a prefix to a namespace IRI.
    ///
    /// A no-op when either the prefix or the IRI belongs to a fixed default
    /// binding. Otherwise upserts by prefix, and any other prefix previously
    /// bound to the same IRI is dropped.
    pub fn bind(&self, prefix: &str, iri: &NamedNode) -> StoreResult<()> {
        let _guard = self.lock()?;
        let records = self.backend.namespaces(&self.id)?;

        if records
            .iter()
            .any(|r| r.fixed && (r.prefix == prefix || r.iri == iri.as_str()))
        {
            return Ok(());
        }

        for stale in records
            .iter()
            .filter(|r| r.iri == iri.as_str() && r.prefix != prefix)
        {
            self.backend.delete_namespace(&self.id, &stale.prefix)?;
        }

        self.backend
            .put_namespace(&self.id, &NamespaceRecord::new(prefix, iri.as_str(), false))?;
        debug!("Store {}: bound {} to {}", self.id, prefix, iri);
        Ok(())
    }

    /// Current bindings. Re-reads storage on every call.
    pub fn namespaces(&self) -> StoreResult<impl Iterator<Item = Namespace>> {
        let namespaces = self
            .backend
            .namespaces(&self.id)?
            .into_iter()
            .map(|r| -> StoreResult<Namespace> {
                Ok(Namespace::new(r.prefix, NamedNode::new(&r.iri)?))
            })
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(namespaces.into_iter())
    }

    /// IRI bound to a prefix
    pub fn namespace(&self, prefix: &str) -> StoreResult<Option<NamedNode>> {
        Ok(self.namespaces()?.find(|ns| ns.prefix == prefix).map(|ns| ns.iri))
    }

    /// Prefix bound to an IRI
    pub fn prefix(&self, iri: &NamedNode) -> StoreResult<Option<String>> {
        Ok(self.namespaces()?.find(|ns| ns.iri == *iri).map(|ns| ns.prefix))
    }

    // Private helper methods

    fn scan(&self, scope: &GraphScope, pattern: &TriplePattern) -> StoreResult<Vec<Quad>> {
        let quad_pattern = QuadPattern::new(scope.clone(), pattern.clone());
        Ok(self.backend.scan(&self.id, &quad_pattern)?)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| {
            StoreError::StorageUnavailable(StorageError::Unavailable(format!(
                "write lock of store {} poisoned",
                self.id
            )))
        })
    }

    /// Idempotent: rewrites a default only when missing or altered
    fn seed_default_namespaces(&self) -> StoreResult<()> {
        let _guard = self.lock()?;
        let records = self.backend.namespaces(&self.id)?;

        for (prefix, iri) in DEFAULT_NAMESPACES {
            let wanted = NamespaceRecord::new(prefix, iri, true);
            if !records.contains(&wanted) {
                self.backend.put_namespace(&self.id, &wanted)?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for TripleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripleStore")
            .field("id", &self.id)
            .field("backend", &self.backend.name())
            .finish()
    }
}
