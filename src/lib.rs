//! Samyama Quad Store
//!
//! An RDF quad store: triples grouped into named contexts, kept in
//! independent stores selected by a store id.
//!
//! # Architecture
//!
//! - `rdf`: term model, wildcard patterns, namespaces, N-Triples/N-Quads I/O
//! - `store`: per-store engine, context and conjunctive views, store registry
//! - `persistence`: storage backends (in-memory, RocksDB)
//! - `config`: backend selection loaded from YAML
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_quadstore::rdf::{GraphName, Literal, NamedNode, Triple, TriplePattern};
//! use samyama_quadstore::StoreRegistry;
//!
//! let registry = StoreRegistry::in_memory();
//!
//! let people = NamedNode::new("http://example.org/people").unwrap();
//! let graph = registry.get_named_graph(people, Some("demo")).unwrap();
//!
//! let alice = NamedNode::new("http://example.org/alice").unwrap();
//! let name = NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! graph.add(&Triple::new(alice.clone(), name, Literal::new_simple_literal("Alice"))).unwrap();
//!
//! // The conjunctive view over the same store sees every context
//! let all = registry.get_conjunctive_graph(Some("demo"), None).unwrap();
//! assert_eq!(all.len().unwrap(), 1);
//! assert_eq!(all.triples(&TriplePattern::any().with_subject(alice)).unwrap().count(), 1);
//! assert!(registry.get_named_graph(GraphName::DefaultGraph, Some("demo")).unwrap().is_empty().unwrap());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod persistence;
pub mod rdf;
pub mod store;

// Re-export main types for convenience
pub use config::{BackendConfig, ConfigError, StoreConfig};

pub use persistence::{MemoryStorage, NamespaceRecord, StorageBackend, StorageError};

#[cfg(feature = "rocksdb")]
pub use persistence::PersistentStorage;

pub use rdf::{
    BlankNode, GraphName, GraphScope, Literal, NamedNode, Namespace, Quad, QuadPattern, RdfError,
    RdfFormat, RdfObject, RdfPredicate, RdfSubject, RdfTerm, SerializationError, Triple,
    TriplePattern,
};

pub use store::{
    get_conjunctive_graph, get_named_graph, ConjunctiveGraph, Graph, NamespaceManager, StoreError,
    StoreRegistry, StoreResult, TripleStore, DEFAULT_STORE_ID,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
