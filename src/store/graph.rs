//! Graph views over a triple store
//!
//! Views hold no data of their own. Two views over the same store id are two
//! handles onto one [`TripleStore`], so writes through either are visible
//! through both.

use super::{NamespaceManager, QuadIterator, StoreResult, TripleIterator, TripleStore};
use crate::rdf::{
    GraphName, GraphScope, NamedNode, Namespace, Quad, RdfObject, RdfPredicate, RdfSubject, Triple,
    TriplePattern,
};
use std::sync::Arc;

/// One context (named graph) of a store
#[derive(Debug, Clone)]
pub struct Graph {
    store: Arc<TripleStore>,
    identifier: GraphName,
}

impl Graph {
    pub fn new(store: Arc<TripleStore>, identifier: impl Into<GraphName>) -> Self {
        Self {
            store,
            identifier: identifier.into(),
        }
    }

    /// Context this view is bound to
    pub fn identifier(&self) -> &GraphName {
        &self.identifier
    }

    pub fn store(&self) -> &Arc<TripleStore> {
        &self.store
    }

    pub fn store_id(&self) -> &str {
        self.store.id()
    }

    /// Add a triple; adding an existing triple changes nothing
    pub fn add(&self, triple: &Triple) -> StoreResult<()> {
        self.store.add(&self.identifier, triple)?;
        Ok(())
    }

    /// Add many triples in one atomic call
    pub fn add_all(&self, triples: impl IntoIterator<Item = Triple>) -> StoreResult<usize> {
        let graph_name = self.identifier.clone();
        self.store
            .add_quads(triples.into_iter().map(|t| t.in_graph(graph_name.clone())))
    }

    /// Remove every triple of this context matching the pattern
    pub fn remove(&self, pattern: &TriplePattern) -> StoreResult<usize> {
        self.store.remove(&self.scope(), pattern)
    }

    pub fn triples(&self, pattern: &TriplePattern) -> StoreResult<TripleIterator> {
        self.store.triples(&self.scope(), pattern)
    }

    /// Every triple of this context
    pub fn iter(&self) -> StoreResult<TripleIterator> {
        self.triples(&TriplePattern::any())
    }

    pub fn len(&self) -> StoreResult<usize> {
        self.store.count(&self.scope(), &TriplePattern::any())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, triple: &Triple) -> StoreResult<bool> {
        Ok(self.store.count(&self.scope(), &TriplePattern::from(triple))? > 0)
    }

    /// Some object of `(subject, predicate, ?)`, if there is one
    pub fn value(
        &self,
        subject: impl Into<RdfSubject>,
        predicate: impl Into<RdfPredicate>,
    ) -> StoreResult<Option<RdfObject>> {
        let pattern = TriplePattern::any()
            .with_subject(subject)
            .with_predicate(predicate);
        Ok(self.triples(&pattern)?.next().map(|t| t.object))
    }

    pub fn namespace_manager(&self) -> NamespaceManager {
        NamespaceManager::new(Arc::clone(&self.store))
    }

    pub fn bind(&self, prefix: &str, iri: &NamedNode) -> StoreResult<()> {
        self.store.bind(prefix, iri)
    }

    pub fn namespaces(&self) -> StoreResult<impl Iterator<Item = Namespace>> {
        self.store.namespaces()
    }

    fn scope(&self) -> GraphScope {
        GraphScope::Graph(self.identifier.clone())
    }
}

/// Union of every context of a store
///
/// Reads, `len` and `remove` span all contexts. Writes land in the view's
/// default context: the identifier it was built with, or the store's
/// implicit default context.
#[derive(Debug, Clone)]
pub struct ConjunctiveGraph {
    store: Arc<TripleStore>,
    default_context: GraphName,
}

impl ConjunctiveGraph {
    pub fn new(store: Arc<TripleStore>) -> Self {
        Self {
            store,
            default_context: GraphName::DefaultGraph,
        }
    }

    /// A conjunctive view whose writes go to `identifier`
    pub fn with_identifier(store: Arc<TripleStore>, identifier: impl Into<GraphName>) -> Self {
        Self {
            store,
            default_context: identifier.into(),
        }
    }

    pub fn identifier(&self) -> &GraphName {
        &self.default_context
    }

    pub fn store(&self) -> &Arc<TripleStore> {
        &self.store
    }

    pub fn store_id(&self) -> &str {
        self.store.id()
    }

    /// Context view that receives this view's writes
    pub fn default_context(&self) -> Graph {
        Graph::new(Arc::clone(&self.store), self.default_context.clone())
    }

    /// Context view over another context of the same store
    pub fn get_context(&self, identifier: impl Into<GraphName>) -> Graph {
        Graph::new(Arc::clone(&self.store), identifier)
    }

    pub fn add(&self, triple: &Triple) -> StoreResult<()> {
        self.store.add(&self.default_context, triple)?;
        Ok(())
    }

    /// Add a quad to its own context
    pub fn add_quad(&self, quad: Quad) -> StoreResult<()> {
        self.store.add_quads(std::iter::once(quad))?;
        Ok(())
    }

    pub fn add_quads(&self, quads: impl IntoIterator<Item = Quad>) -> StoreResult<usize> {
        self.store.add_quads(quads)
    }

    /// Remove matching triples from every context of the store
    pub fn remove(&self, pattern: &TriplePattern) -> StoreResult<usize> {
        self.store.remove(&GraphScope::All, pattern)
    }

    /// Matching triples across all contexts; a triple stored in two contexts
    /// is yielded twice
    pub fn triples(&self, pattern: &TriplePattern) -> StoreResult<TripleIterator> {
        self.store.triples(&GraphScope::All, pattern)
    }

    pub fn quads(&self, pattern: &TriplePattern) -> StoreResult<QuadIterator> {
        self.store.quads(&GraphScope::All, pattern)
    }

    pub fn iter(&self) -> StoreResult<TripleIterator> {
        self.triples(&TriplePattern::any())
    }

    /// Quad count over all contexts, not de-duplicated
    pub fn len(&self) -> StoreResult<usize> {
        self.store.count(&GraphScope::All, &TriplePattern::any())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, triple: &Triple) -> StoreResult<bool> {
        Ok(self.store.count(&GraphScope::All, &TriplePattern::from(triple))? > 0)
    }

    pub fn value(
        &self,
        subject: impl Into<RdfSubject>,
        predicate: impl Into<RdfPredicate>,
    ) -> StoreResult<Option<RdfObject>> {
        let pattern = TriplePattern::any()
            .with_subject(subject)
            .with_predicate(predicate);
        Ok(self.triples(&pattern)?.next().map(|t| t.object))
    }

    /// Contexts holding at least one quad
    pub fn contexts(&self) -> StoreResult<impl Iterator<Item = GraphName>> {
        self.store.contexts()
    }

    pub fn namespace_manager(&self) -> NamespaceManager {
        NamespaceManager::new(Arc::clone(&self.store))
    }

    pub fn bind(&self, prefix: &str, iri: &NamedNode) -> StoreResult<()> {
        self.store.bind(prefix, iri)
    }

    pub fn namespaces(&self) -> StoreResult<impl Iterator<Item = Namespace>> {
        self.store.namespaces()
    }
}
