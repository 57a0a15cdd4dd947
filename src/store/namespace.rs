//! Namespace manager attached to a graph view

use super::{StoreResult, TripleStore};
use crate::rdf::{self, NamedNode, Namespace, PrefixResult};
use std::sync::Arc;

/// Prefix ↔ IRI bindings of the store behind a view
///
/// Bindings belong to the store, so every view over the same store id sees
/// the same table.
#[derive(Debug, Clone)]
pub struct NamespaceManager {
    store: Arc<TripleStore>,
}

impl NamespaceManager {
    pub fn new(store: Arc<TripleStore>) -> Self {
        Self { store }
    }

    /// Bind a prefix; silently ignored if it touches a default binding
    pub fn bind(&self, prefix: &str, iri: &NamedNode) -> StoreResult<()> {
        self.store.bind(prefix, iri)
    }

    /// All bindings, stable order within one call
    pub fn namespaces(&self) -> StoreResult<impl Iterator<Item = Namespace>> {
        self.store.namespaces()
    }

    pub fn lookup(&self, prefix: &str) -> StoreResult<Option<NamedNode>> {
        self.store.namespace(prefix)
    }

    pub fn reverse_lookup(&self, iri: &NamedNode) -> StoreResult<Option<String>> {
        self.store.prefix(iri)
    }

    /// `prefix:local` → full IRI
    pub fn expand(&self, compact_iri: &str) -> StoreResult<PrefixResult<NamedNode>> {
        let namespaces: Vec<Namespace> = self.namespaces()?.collect();
        Ok(rdf::expand(&namespaces, compact_iri))
    }

    /// Full IRI → `prefix:local`, using the longest bound namespace
    pub fn compact(&self, iri: &NamedNode) -> StoreResult<Option<String>> {
        let namespaces: Vec<Namespace> = self.namespaces()?.collect();
        Ok(rdf::compact(&namespaces, iri.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::rdf::XML_NAMESPACE;

    fn manager() -> NamespaceManager {
        let store = TripleStore::open("ns", Arc::new(MemoryStorage::new())).unwrap();
        NamespaceManager::new(Arc::new(store))
    }

    #[test]
    fn test_default_lookups() {
        let mgr = manager();
        let xml = NamedNode::new(XML_NAMESPACE.1).unwrap();

        assert_eq!(mgr.lookup("xml").unwrap(), Some(xml.clone()));
        assert_eq!(mgr.reverse_lookup(&xml).unwrap(), Some("xml".to_string()));
        assert_eq!(mgr.lookup("nope").unwrap(), None);
    }

    #[test]
    fn test_expand_and_compact_with_custom_binding() {
        let mgr = manager();
        mgr.bind("ex", &NamedNode::new("http://example.org/").unwrap()).unwrap();

        let alice = mgr.expand("ex:alice").unwrap().unwrap();
        assert_eq!(alice.as_str(), "http://example.org/alice");
        assert_eq!(mgr.compact(&alice).unwrap(), Some("ex:alice".to_string()));

        let rdf_type = mgr.expand("rdf:type").unwrap().unwrap();
        assert_eq!(mgr.compact(&rdf_type).unwrap(), Some("rdf:type".to_string()));

        assert!(mgr.expand("foaf:name").unwrap().is_err());
    }
}
