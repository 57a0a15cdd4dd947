//! RDF namespace bindings
//!
//! Prefix ↔ IRI bindings and compact IRI notation (`prefix:local`). Every
//! store is seeded with three fixed bindings that can be neither rebound nor
//! shadowed by another prefix.

use super::types::NamedNode;
use thiserror::Error;

/// `xml` default binding
pub const XML_NAMESPACE: (&str, &str) = ("xml", "http://www.w3.org/XML/1998/namespace");
/// `rdf` default binding
pub const RDF_NAMESPACE: (&str, &str) = ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
/// `rdfs` default binding
pub const RDFS_NAMESPACE: (&str, &str) = ("rdfs", "http://www.w3.org/2000/01/rdf-schema#");

/// Bindings every store starts with
pub const DEFAULT_NAMESPACES: [(&str, &str); 3] = [XML_NAMESPACE, RDF_NAMESPACE, RDFS_NAMESPACE];

/// Prefix errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

/// Namespace (prefix → IRI binding)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// Prefix
    pub prefix: String,
    /// IRI
    pub iri: NamedNode,
}

impl Namespace {
    /// Create a new namespace
    pub fn new(prefix: impl Into<String>, iri: NamedNode) -> Self {
        Self {
            prefix: prefix.into(),
            iri,
        }
    }
}

/// True if the prefix belongs to one of the default bindings
pub fn is_default_prefix(prefix: &str) -> bool {
    DEFAULT_NAMESPACES.iter().any(|(p, _)| *p == prefix)
}

/// True if the IRI belongs to one of the default bindings
pub fn is_default_iri(iri: &str) -> bool {
    DEFAULT_NAMESPACES.iter().any(|(_, i)| *i == iri)
}

/// Expand a compact IRI (prefix:local) against a set of bindings
pub fn expand<'a>(
    namespaces: impl IntoIterator<Item = &'a Namespace>,
    compact_iri: &str,
) -> PrefixResult<NamedNode> {
    let (prefix, local) = compact_iri
        .split_once(':')
        .ok_or_else(|| PrefixError::InvalidIri(compact_iri.to_string()))?;

    let namespace = namespaces
        .into_iter()
        .find(|ns| ns.prefix == prefix)
        .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))?;

    NamedNode::new(&format!("{}{}", namespace.iri.as_str(), local))
        .map_err(|e| PrefixError::InvalidIri(e.to_string()))
}

/// Compact an IRI using the longest matching namespace
pub fn compact<'a>(namespaces: impl IntoIterator<Item = &'a Namespace>, iri: &str) -> Option<String> {
    namespaces
        .into_iter()
        .filter(|ns| iri.starts_with(ns.iri.as_str()))
        .max_by_key(|ns| ns.iri.as_str().len())
        .map(|ns| format!("{}:{}", ns.prefix, &iri[ns.iri.as_str().len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> Vec<Namespace> {
        let mut namespaces: Vec<Namespace> = DEFAULT_NAMESPACES
            .iter()
            .map(|(p, i)| Namespace::new(*p, NamedNode::new(i).unwrap()))
            .collect();
        namespaces.push(Namespace::new("foaf", NamedNode::new("http://xmlns.com/foaf/0.1/").unwrap()));
        namespaces
    }

    #[test]
    fn test_default_membership() {
        assert!(is_default_prefix("xml"));
        assert!(is_default_iri("http://www.w3.org/2000/01/rdf-schema#"));
        assert!(!is_default_prefix("foaf"));
        assert!(!is_default_iri("http://example.com/xml"));
    }

    #[test]
    fn test_expand() {
        let namespaces = bindings();

        let expanded = expand(&namespaces, "foaf:name").unwrap();
        assert_eq!(expanded.as_str(), "http://xmlns.com/foaf/0.1/name");

        let expanded = expand(&namespaces, "rdf:type").unwrap();
        assert_eq!(expanded.as_str(), "http://www.w3.org/1999/02/22-rdf-syntax-ns#type");

        assert_eq!(
            expand(&namespaces, "ex:alice"),
            Err(PrefixError::UnknownPrefix("ex".to_string()))
        );
        assert!(matches!(expand(&namespaces, "no-colon"), Err(PrefixError::InvalidIri(_))));
    }

    #[test]
    fn test_compact() {
        let namespaces = bindings();

        assert_eq!(
            compact(&namespaces, "http://xmlns.com/foaf/0.1/name"),
            Some("foaf:name".to_string())
        );
        assert_eq!(
            compact(&namespaces, "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            Some("rdf:type".to_string())
        );
        assert_eq!(compact(&namespaces, "http://example.org/x"), None);
    }
}
