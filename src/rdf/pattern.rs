//! Triple and quad patterns
//!
//! A pattern slot is either bound to a concrete term or a wildcard. The
//! wildcard is its own variant so that no term value (an empty literal, a
//! boolean `false`) can ever be mistaken for "match anything".

use super::types::{GraphName, Quad, RdfObject, RdfPredicate, RdfSubject, RdfTerm, Triple};
use thiserror::Error;

/// Pattern errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A bound slot holds a term that can never appear in that position
    #[error("Invalid {slot} in pattern: {reason}")]
    InvalidSlot {
        slot: &'static str,
        reason: String,
    },
}

pub type PatternResult<T> = Result<T, PatternError>;

/// One slot of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm<T> {
    /// Matches any value
    Wildcard,
    /// Matches exactly this value
    Bound(T),
}

impl<T: PartialEq> PatternTerm<T> {
    /// Check a candidate value against this slot
    pub fn matches(&self, candidate: &T) -> bool {
        match self {
            PatternTerm::Wildcard => true,
            PatternTerm::Bound(value) => value == candidate,
        }
    }
}

impl<T> PatternTerm<T> {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, PatternTerm::Wildcard)
    }

    /// The bound value, if any
    pub fn bound(&self) -> Option<&T> {
        match self {
            PatternTerm::Wildcard => None,
            PatternTerm::Bound(value) => Some(value),
        }
    }
}

// Manual so that `T` needs no `Default`
impl<T> Default for PatternTerm<T> {
    fn default() -> Self {
        PatternTerm::Wildcard
    }
}

impl<T> From<T> for PatternTerm<T> {
    fn from(value: T) -> Self {
        PatternTerm::Bound(value)
    }
}

/// Triple pattern with independently optional slots
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TriplePattern {
    pub subject: PatternTerm<RdfSubject>,
    pub predicate: PatternTerm<RdfPredicate>,
    pub object: PatternTerm<RdfObject>,
}

impl TriplePattern {
    /// Create a new triple pattern
    pub fn new(
        subject: PatternTerm<RdfSubject>,
        predicate: PatternTerm<RdfPredicate>,
        object: PatternTerm<RdfObject>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// `(?, ?, ?)`
    pub fn any() -> Self {
        Self::default()
    }

    /// Bind the subject slot
    pub fn with_subject(mut self, subject: impl Into<RdfSubject>) -> Self {
        self.subject = PatternTerm::Bound(subject.into());
        self
    }

    /// Bind the predicate slot
    pub fn with_predicate(mut self, predicate: impl Into<RdfPredicate>) -> Self {
        self.predicate = PatternTerm::Bound(predicate.into());
        self
    }

    /// Bind the object slot
    pub fn with_object(mut self, object: impl Into<RdfObject>) -> Self {
        self.object = PatternTerm::Bound(object.into());
        self
    }

    /// Build a pattern from untyped terms, `None` meaning wildcard.
    ///
    /// Rejects literals in subject position and anything but an IRI in
    /// predicate position.
    pub fn from_terms(
        subject: Option<RdfTerm>,
        predicate: Option<RdfTerm>,
        object: Option<RdfTerm>,
    ) -> PatternResult<Self> {
        let subject = match subject {
            None => PatternTerm::Wildcard,
            Some(term) => PatternTerm::Bound(RdfSubject::try_from(term).map_err(|e| {
                PatternError::InvalidSlot {
                    slot: "subject",
                    reason: e.to_string(),
                }
            })?),
        };
        let predicate = match predicate {
            None => PatternTerm::Wildcard,
            Some(term) => PatternTerm::Bound(RdfPredicate::try_from(term).map_err(|e| {
                PatternError::InvalidSlot {
                    slot: "predicate",
                    reason: e.to_string(),
                }
            })?),
        };
        let object = object.map_or(PatternTerm::Wildcard, |term| {
            PatternTerm::Bound(RdfObject::from(term))
        });

        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    /// Check if a triple matches this pattern
    pub fn matches(&self, triple: &Triple) -> bool {
        self.subject.matches(&triple.subject)
            && self.predicate.matches(&triple.predicate)
            && self.object.matches(&triple.object)
    }

    /// True when every slot is a wildcard
    pub fn is_wildcard(&self) -> bool {
        self.subject.is_wildcard() && self.predicate.is_wildcard() && self.object.is_wildcard()
    }
}

impl From<&Triple> for TriplePattern {
    fn from(triple: &Triple) -> Self {
        Self {
            subject: PatternTerm::Bound(triple.subject.clone()),
            predicate: PatternTerm::Bound(triple.predicate.clone()),
            object: PatternTerm::Bound(triple.object.clone()),
        }
    }
}

/// Which contexts of a store an operation covers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum GraphScope {
    /// Every context of the store
    #[default]
    All,
    /// Exactly one context
    Graph(GraphName),
}

impl GraphScope {
    /// The store's implicit default context
    pub fn default_graph() -> Self {
        GraphScope::Graph(GraphName::DefaultGraph)
    }

    pub fn matches(&self, graph_name: &GraphName) -> bool {
        match self {
            GraphScope::All => true,
            GraphScope::Graph(g) => g == graph_name,
        }
    }

    /// The context this scope is restricted to, if any
    pub fn graph(&self) -> Option<&GraphName> {
        match self {
            GraphScope::All => None,
            GraphScope::Graph(g) => Some(g),
        }
    }
}

impl From<GraphName> for GraphScope {
    fn from(graph_name: GraphName) -> Self {
        GraphScope::Graph(graph_name)
    }
}

/// Quad pattern: a triple pattern restricted to a context scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QuadPattern {
    pub graph: GraphScope,
    pub triple: TriplePattern,
}

impl QuadPattern {
    pub fn new(graph: impl Into<GraphScope>, triple: TriplePattern) -> Self {
        Self {
            graph: graph.into(),
            triple,
        }
    }

    /// Every quad of a store
    pub fn any() -> Self {
        Self::default()
    }

    /// Check if a quad matches this pattern
    pub fn matches(&self, quad: &Quad) -> bool {
        self.graph.matches(&quad.graph_name)
            && self.triple.subject.matches(&quad.subject)
            && self.triple.predicate.matches(&quad.predicate)
            && self.triple.object.matches(&quad.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::{Literal, NamedNode};

    fn alice_name() -> Triple {
        Triple::new(
            NamedNode::new("http://example.org/alice").unwrap(),
            RdfPredicate::new("http://xmlns.com/foaf/0.1/name").unwrap(),
            Literal::new_simple_literal("Alice"),
        )
    }

    #[test]
    fn test_triple_pattern_matching() {
        let triple = alice_name();

        let pattern = TriplePattern::any().with_subject(triple.subject.clone());
        assert!(pattern.matches(&triple));

        let bob = NamedNode::new("http://example.org/bob").unwrap();
        let pattern = TriplePattern::any().with_subject(bob);
        assert!(!pattern.matches(&triple));

        assert!(TriplePattern::any().matches(&triple));
        assert!(TriplePattern::from(&triple).matches(&triple));
    }

    #[test]
    fn test_non_contiguous_slots() {
        let triple = alice_name();
        let pattern = TriplePattern::any()
            .with_subject(triple.subject.clone())
            .with_object(triple.object.clone());
        assert!(pattern.predicate.is_wildcard());
        assert!(pattern.matches(&triple));
    }

    #[test]
    fn test_falsy_bound_object_is_not_a_wildcard() {
        let triple = alice_name();
        let pattern = TriplePattern::any().with_object(Literal::new_simple_literal(""));
        assert!(!pattern.is_wildcard());
        assert!(!pattern.matches(&triple));

        let pattern = TriplePattern::any().with_object(Literal::new_boolean(false));
        assert!(!pattern.matches(&triple));
    }

    #[test]
    fn test_from_terms_rejects_malformed_slots() {
        let literal: RdfTerm = Literal::new_simple_literal("p").into();

        let err = TriplePattern::from_terms(None, Some(literal.clone()), None).unwrap_err();
        assert!(matches!(err, PatternError::InvalidSlot { slot: "predicate", .. }));

        let err = TriplePattern::from_terms(Some(literal.clone()), None, None).unwrap_err();
        assert!(matches!(err, PatternError::InvalidSlot { slot: "subject", .. }));

        let pattern = TriplePattern::from_terms(None, None, Some(literal)).unwrap();
        assert!(pattern.object.bound().is_some());
    }

    #[test]
    fn test_quad_pattern_scope() {
        let graph = GraphName::from(NamedNode::new("http://example.org/g1").unwrap());
        let quad = alice_name().in_graph(graph.clone());

        assert!(QuadPattern::any().matches(&quad));
        assert!(QuadPattern::new(graph, TriplePattern::any()).matches(&quad));
        assert!(!QuadPattern::new(GraphScope::default_graph(), TriplePattern::any()).matches(&quad));
    }
}
