//! In-memory quad index
//!
//! Holds the quads of one store with a hash index per dimension:
//! - graph → quad ids
//! - subject → quad ids
//! - predicate → quad ids
//! - object → quad ids
//!
//! A pattern lookup takes the smallest candidate set among its bound slots
//! and filters it with the full pattern, so any combination of bound and
//! wildcard slots is served without a full scan.

use crate::rdf::{GraphName, PatternTerm, Quad, QuadPattern, RdfObject, RdfPredicate, RdfSubject};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;

type QuadId = u64;
type Postings<K> = FxHashMap<K, FxHashSet<QuadId>>;

/// Set of quads with per-dimension indices
#[derive(Debug, Clone, Default)]
pub struct QuadIndex {
    next_id: QuadId,
    /// Primary storage
    quads: FxHashMap<QuadId, Quad>,
    /// Quad identity → id, enforces set semantics
    ids: FxHashMap<Quad, QuadId>,
    graph_index: Postings<GraphName>,
    subject_index: Postings<RdfSubject>,
    predicate_index: Postings<RdfPredicate>,
    object_index: Postings<RdfObject>,
}

impl QuadIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quad. Returns false if it was already present.
    pub fn insert(&mut self, quad: Quad) -> bool {
        if self.ids.contains_key(&quad) {
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;

        post(&mut self.graph_index, &quad.graph_name, id);
        post(&mut self.subject_index, &quad.subject, id);
        post(&mut self.predicate_index, &quad.predicate, id);
        post(&mut self.object_index, &quad.object, id);

        self.ids.insert(quad.clone(), id);
        self.quads.insert(id, quad);
        true
    }

    /// Remove a single quad. Returns false if it was absent.
    pub fn remove(&mut self, quad: &Quad) -> bool {
        match self.ids.remove(quad) {
            Some(id) => {
                self.unlink(id, quad);
                self.quads.remove(&id);
                true
            }
            None => false,
        }
    }

    /// Remove every quad matching the pattern, returning how many went away
    pub fn remove_matching(&mut self, pattern: &QuadPattern) -> usize {
        if *pattern == QuadPattern::any() {
            let removed = self.quads.len();
            self.clear();
            return removed;
        }

        let doomed: Vec<QuadId> = self.candidate_ids(pattern);
        for id in &doomed {
            if let Some(quad) = self.quads.remove(id) {
                self.ids.remove(&quad);
                self.unlink(*id, &quad);
            }
        }
        doomed.len()
    }

    /// Iterate quads matching the pattern
    pub fn matching<'a>(&'a self, pattern: &'a QuadPattern) -> Box<dyn Iterator<Item = &'a Quad> + 'a> {
        match self.smallest_postings(pattern) {
            Lookup::Empty => Box::new(std::iter::empty()),
            Lookup::Scan => Box::new(self.quads.values().filter(move |q| pattern.matches(q))),
            Lookup::Postings(ids) => Box::new(
                ids.iter()
                    .filter_map(move |id| self.quads.get(id))
                    .filter(move |q| pattern.matches(q)),
            ),
        }
    }

    /// Count quads matching the pattern
    pub fn count(&self, pattern: &QuadPattern) -> usize {
        if pattern.triple.is_wildcard() {
            // Answerable from the postings alone
            return match pattern.graph.graph() {
                None => self.quads.len(),
                Some(g) => self.graph_index.get(g).map_or(0, |ids| ids.len()),
            };
        }
        self.matching(pattern).count()
    }

    pub fn contains(&self, quad: &Quad) -> bool {
        self.ids.contains_key(quad)
    }

    /// Distinct contexts holding at least one quad
    pub fn graphs(&self) -> impl Iterator<Item = &GraphName> {
        self.graph_index.keys()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn clear(&mut self) {
        self.quads.clear();
        self.ids.clear();
        self.graph_index.clear();
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();
    }

    // Private helper methods

    fn candidate_ids(&self, pattern: &QuadPattern) -> Vec<QuadId> {
        let accept = |id: &QuadId| self.quads.get(id).is_some_and(|q| pattern.matches(q));
        match self.smallest_postings(pattern) {
            Lookup::Empty => Vec::new(),
            Lookup::Scan => self.quads.keys().copied().filter(accept).collect(),
            Lookup::Postings(ids) => ids.iter().copied().filter(accept).collect(),
        }
    }

    fn smallest_postings(&self, pattern: &QuadPattern) -> Lookup<'_> {
        let mut best: Option<&FxHashSet<QuadId>> = None;

        let graph = pattern.graph.graph().map(|g| self.graph_index.get(g));
        let subject = bound_postings(&self.subject_index, &pattern.triple.subject);
        let predicate = bound_postings(&self.predicate_index, &pattern.triple.predicate);
        let object = bound_postings(&self.object_index, &pattern.triple.object);

        for slot in [graph, subject, predicate, object].into_iter().flatten() {
            match slot {
                // A bound value nobody carries rules out every quad
                None => return Lookup::Empty,
                Some(ids) => {
                    if best.map_or(true, |b| ids.len() < b.len()) {
                        best = Some(ids);
                    }
                }
            }
        }

        match best {
            Some(ids) => Lookup::Postings(ids),
            None => Lookup::Scan,
        }
    }

    fn unlink(&mut self, id: QuadId, quad: &Quad) {
        unpost(&mut self.graph_index, &quad.graph_name, id);
        unpost(&mut self.subject_index, &quad.subject, id);
        unpost(&mut self.predicate_index, &quad.predicate, id);
        unpost(&mut self.object_index, &quad.object, id);
    }
}

enum Lookup<'a> {
    Empty,
    Scan,
    Postings(&'a FxHashSet<QuadId>),
}

/// `None` for a wildcard slot, `Some(None)` for a bound value with no postings
fn bound_postings<'a, K: Eq + Hash>(
    index: &'a Postings<K>,
    slot: &PatternTerm<K>,
) -> Option<Option<&'a FxHashSet<QuadId>>> {
    slot.bound().map(|key| index.get(key))
}

fn post<K: Eq + Hash + Clone>(index: &mut Postings<K>, key: &K, id: QuadId) {
    index.entry(key.clone()).or_default().insert(id);
}

fn unpost<K: Eq + Hash>(index: &mut Postings<K>, key: &K, id: QuadId) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{GraphScope, Literal, NamedNode, Triple, TriplePattern};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(&format!("http://example.org/{}", s)).unwrap()
    }

    fn quad(s: &str, p: &str, o: &str, g: GraphName) -> Quad {
        Triple::new(iri(s), iri(p), iri(o)).in_graph(g)
    }

    fn sample() -> QuadIndex {
        let g1: GraphName = iri("g1").into();
        let mut index = QuadIndex::new();
        index.insert(quad("s1", "p", "o1", GraphName::DefaultGraph));
        index.insert(quad("s1", "p", "o2", GraphName::DefaultGraph));
        index.insert(quad("s2", "p", "o1", GraphName::DefaultGraph));
        index.insert(quad("s1", "p", "o1", g1));
        index
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut index = QuadIndex::new();
        let q = quad("a", "b", "c", GraphName::DefaultGraph);

        assert!(index.insert(q.clone()));
        assert!(!index.insert(q.clone()));
        assert_eq!(index.len(), 1);
        assert!(index.contains(&q));
    }

    #[test]
    fn test_same_triple_in_two_graphs() {
        let index = sample();
        assert_eq!(index.len(), 4);
        assert_eq!(index.graphs().count(), 2);
    }

    #[test]
    fn test_match_each_slot() {
        let index = sample();
        let default_scope = GraphScope::default_graph();

        let by_subject = QuadPattern::new(
            default_scope.clone(),
            TriplePattern::any().with_subject(iri("s1")).with_predicate(iri("p")),
        );
        assert_eq!(index.count(&by_subject), 2);

        let by_object = QuadPattern::new(
            default_scope.clone(),
            TriplePattern::any().with_predicate(iri("p")).with_object(iri("o1")),
        );
        assert_eq!(index.count(&by_object), 2);

        let subject_and_object = QuadPattern::new(
            default_scope,
            TriplePattern::any().with_subject(iri("s2")).with_object(iri("o1")),
        );
        assert_eq!(index.count(&subject_and_object), 1);

        let everywhere = QuadPattern::new(
            GraphScope::All,
            TriplePattern::any().with_subject(iri("s1")).with_object(iri("o1")),
        );
        assert_eq!(index.count(&everywhere), 2);
    }

    #[test]
    fn test_unknown_bound_value_matches_nothing() {
        let index = sample();
        let pattern = QuadPattern::new(
            GraphScope::All,
            TriplePattern::any().with_object(Literal::new_simple_literal("")),
        );
        assert_eq!(index.matching(&pattern).count(), 0);
        assert_eq!(index.count(&pattern), 0);
    }

    #[test]
    fn test_remove_matching_prunes_graphs() {
        let mut index = sample();
        let g1: GraphName = iri("g1").into();

        let removed = index.remove_matching(&QuadPattern::new(g1.clone(), TriplePattern::any()));
        assert_eq!(removed, 1);
        assert_eq!(index.len(), 3);
        assert!(index.graphs().all(|g| *g != g1));

        let removed = index.remove_matching(&QuadPattern::any());
        assert_eq!(removed, 3);
        assert!(index.is_empty());
        assert_eq!(index.graphs().count(), 0);
    }

    #[test]
    fn test_remove_single_quad() {
        let mut index = sample();
        let q = quad("s2", "p", "o1", GraphName::DefaultGraph);

        assert!(index.remove(&q));
        assert!(!index.remove(&q));
        assert_eq!(index.len(), 3);

        let by_subject = QuadPattern::new(GraphScope::All, TriplePattern::any().with_subject(iri("s2")));
        assert_eq!(index.count(&by_subject), 0);
    }
}
