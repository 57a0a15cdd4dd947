//! RDF data model
//!
//! - Terms: IRIs, blank nodes, literals
//! - Triples and quads (triple + context)
//! - Wildcard patterns over triples and quads
//! - Namespace bindings and compact IRIs
//! - N-Triples / N-Quads import and export
//!
//! # Example
//!
//! ```rust
//! use samyama_quadstore::rdf::{Literal, NamedNode, Triple, TriplePattern};
//!
//! let alice = NamedNode::new("http://example.org/alice").unwrap();
//! let name = NamedNode::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let triple = Triple::new(alice.clone(), name, Literal::new_simple_literal("Alice"));
//!
//! let pattern = TriplePattern::any().with_subject(alice);
//! assert!(pattern.matches(&triple));
//! ```

mod namespace;
mod pattern;
pub mod serialization;
mod types;

pub use types::{
    BlankNode, GraphName, Literal, NamedNode, Quad, RdfError, RdfObject, RdfPredicate, RdfResult,
    RdfSubject, RdfTerm, Triple,
};

pub use pattern::{GraphScope, PatternError, PatternResult, PatternTerm, QuadPattern, TriplePattern};

pub use namespace::{
    compact, expand, is_default_iri, is_default_prefix, Namespace, PrefixError, PrefixResult,
    DEFAULT_NAMESPACES, RDFS_NAMESPACE, RDF_NAMESPACE, XML_NAMESPACE,
};

pub use serialization::{RdfFormat, SerializationError, SerializationResult};
