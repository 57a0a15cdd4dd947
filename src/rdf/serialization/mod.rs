//! RDF serialization formats
//!
//! Line-based formats over graph views:
//! - N-Triples (NT) into and out of one context
//! - N-Quads (NQ) into and out of a whole store

use super::{
    BlankNode, GraphName, Literal, NamedNode, Quad, RdfError, RdfObject, RdfSubject, Triple,
    TriplePattern,
};
use crate::store::{ConjunctiveGraph, Graph, StoreError};
use rio_api::formatter::{QuadsFormatter, TriplesFormatter};
use rio_api::model as rio;
use rio_api::parser::{QuadsParser, TriplesParser};
use rio_turtle::{NQuadsFormatter, NQuadsParser, NTriplesFormatter, NTriplesParser, TurtleError};
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::info;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// N-Triples format (.nt)
    NTriples,
    /// N-Quads format (.nq)
    NQuads,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "nt" => Some(RdfFormat::NTriples),
            "nq" => Some(RdfFormat::NQuads),
            _ => None,
        }
    }
}

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializationError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error in the input
    #[error("Parse error: {0}")]
    Parse(#[from] TurtleError),

    /// Input term not representable in the store
    #[error("Term error: {0}")]
    Term(#[from] RdfError),

    /// Store rejected the data
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type SerializationResult<T> = Result<T, SerializationError>;

/// Load N-Triples into one context. Returns how many triples were new.
pub fn import_ntriples(graph: &Graph, reader: impl BufRead) -> SerializationResult<usize> {
    let mut triples = Vec::new();
    NTriplesParser::new(reader).parse_all(&mut |t| -> SerializationResult<()> {
        triples.push(triple_from_rio(&t)?);
        Ok(())
    })?;

    let parsed = triples.len();
    let added = graph.add_all(triples)?;
    info!("Imported {} of {} triples into {}", added, parsed, graph.identifier());
    Ok(added)
}

/// Load N-Quads into a store; quads without a context go to the view's
/// default context
pub fn import_nquads(graph: &ConjunctiveGraph, reader: impl BufRead) -> SerializationResult<usize> {
    let mut quads = Vec::new();
    NQuadsParser::new(reader).parse_all(&mut |q| -> SerializationResult<()> {
        let graph_name = match q.graph_name {
            None => graph.identifier().clone(),
            Some(rio::GraphName::NamedNode(n)) => NamedNode::new(n.iri)?.into(),
            Some(rio::GraphName::BlankNode(b)) => BlankNode::from_id(b.id)?.into(),
        };
        let triple = triple_from_rio(&rio::Triple {
            subject: q.subject,
            predicate: q.predicate,
            object: q.object,
        })?;
        quads.push(triple.in_graph(graph_name));
        Ok(())
    })?;

    let parsed = quads.len();
    let added = graph.add_quads(quads)?;
    info!("Imported {} of {} quads into store {}", added, parsed, graph.store_id());
    Ok(added)
}

/// Write one context as N-Triples. Returns how many triples were written.
pub fn export_ntriples<W: Write>(graph: &Graph, writer: W) -> SerializationResult<usize> {
    let mut formatter = NTriplesFormatter::new(writer);
    let mut written = 0;
    for triple in graph.iter()? {
        with_rio_triple(&triple, |t| formatter.format(t))?;
        written += 1;
    }
    formatter.finish()?;
    Ok(written)
}

/// Write every context of a store as N-Quads
pub fn export_nquads<W: Write>(graph: &ConjunctiveGraph, writer: W) -> SerializationResult<usize> {
    let mut formatter = NQuadsFormatter::new(writer);
    let mut written = 0;
    for quad in graph.quads(&TriplePattern::any())? {
        write_quad(&mut formatter, &quad)?;
        written += 1;
    }
    formatter.finish()?;
    Ok(written)
}

fn write_quad<W: Write>(formatter: &mut NQuadsFormatter<W>, quad: &Quad) -> std::io::Result<()> {
    let graph_name = match &quad.graph_name {
        GraphName::DefaultGraph => None,
        GraphName::NamedNode(n) => Some(rio::GraphName::NamedNode(rio::NamedNode { iri: n.as_str() })),
        GraphName::BlankNode(b) => Some(rio::GraphName::BlankNode(rio::BlankNode { id: b.as_str() })),
    };
    with_rio_triple(&quad.as_triple(), |t| {
        formatter.format(&rio::Quad {
            subject: t.subject,
            predicate: t.predicate,
            object: t.object,
            graph_name,
        })
    })
}

fn triple_from_rio(t: &rio::Triple<'_>) -> Result<Triple, RdfError> {
    let subject: RdfSubject = match t.subject {
        rio::Subject::NamedNode(n) => NamedNode::new(n.iri)?.into(),
        rio::Subject::BlankNode(b) => BlankNode::from_id(b.id)?.into(),
        #[allow(unreachable_patterns)]
        _ => return Err(RdfError::UnsupportedTerm("quoted triple subject".to_string())),
    };
    let object: RdfObject = match t.object {
        rio::Term::NamedNode(n) => NamedNode::new(n.iri)?.into(),
        rio::Term::BlankNode(b) => BlankNode::from_id(b.id)?.into(),
        rio::Term::Literal(rio::Literal::Simple { value }) => Literal::new_simple_literal(value).into(),
        rio::Term::Literal(rio::Literal::LanguageTaggedString { value, language }) => {
            Literal::new_language_tagged_literal(value, language)?.into()
        }
        rio::Term::Literal(rio::Literal::Typed { value, datatype }) => {
            Literal::new_typed_literal(value, NamedNode::new(datatype.iri)?).into()
        }
        #[allow(unreachable_patterns)]
        _ => return Err(RdfError::UnsupportedTerm("quoted triple object".to_string())),
    };
    Ok(Triple::new(subject, NamedNode::new(t.predicate.iri)?, object))
}

/// Borrow a stored triple as a rio triple
fn with_rio_triple<R>(triple: &Triple, f: impl FnOnce(&rio::Triple<'_>) -> R) -> R {
    let datatype = match &triple.object {
        RdfObject::Literal(l) => Some(l.datatype()),
        _ => None,
    };

    let subject = match &triple.subject {
        RdfSubject::NamedNode(n) => rio::Subject::NamedNode(rio::NamedNode { iri: n.as_str() }),
        RdfSubject::BlankNode(b) => rio::Subject::BlankNode(rio::BlankNode { id: b.as_str() }),
    };
    let object = match (&triple.object, &datatype) {
        (RdfObject::NamedNode(n), _) => rio::Term::NamedNode(rio::NamedNode { iri: n.as_str() }),
        (RdfObject::BlankNode(b), _) => rio::Term::BlankNode(rio::BlankNode { id: b.as_str() }),
        (RdfObject::Literal(l), Some(datatype)) => rio::Term::Literal(match l.language() {
            Some(language) => rio::Literal::LanguageTaggedString {
                value: l.value(),
                language,
            },
            None if l.is_plain() => rio::Literal::Simple { value: l.value() },
            None => rio::Literal::Typed {
                value: l.value(),
                datatype: rio::NamedNode { iri: datatype.as_str() },
            },
        }),
        (RdfObject::Literal(l), None) => rio::Term::Literal(rio::Literal::Simple { value: l.value() }),
    };

    f(&rio::Triple {
        subject,
        predicate: rio::NamedNode {
            iri: triple.predicate.as_str(),
        },
        object,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreRegistry;

    const NT: &str = r#"<http://zoowizard.eu/resource/Artis> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Zoo> .
<http://zoowizard.eu/resource/Artis> <http://www.w3.org/2000/01/rdf-schema#label> "Artis" .
<http://zoowizard.eu/resource/Artis> <http://www.example.com/open> "false"^^<http://www.w3.org/2001/XMLSchema#boolean> .
<http://zoowizard.eu/resource/Artis> <http://www.example.com/name> "Artis"@nl .
_:anon <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Zoo> .
"#;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(RdfFormat::from_extension("NT"), Some(RdfFormat::NTriples));
        assert_eq!(RdfFormat::from_extension("nq"), Some(RdfFormat::NQuads));
        assert_eq!(RdfFormat::from_extension("ttl"), None);
    }

    #[test]
    fn test_ntriples_import_export() {
        let registry = StoreRegistry::in_memory();
        let graph = registry.get_named_graph(GraphName::DefaultGraph, None).unwrap();

        assert_eq!(import_ntriples(&graph, NT.as_bytes()).unwrap(), 5);
        assert_eq!(import_ntriples(&graph, NT.as_bytes()).unwrap(), 0);
        assert_eq!(graph.len().unwrap(), 5);

        let mut out = Vec::new();
        assert_eq!(export_ntriples(&graph, &mut out).unwrap(), 5);

        let copy = registry.get_named_graph(GraphName::DefaultGraph, Some("copy")).unwrap();
        import_ntriples(&copy, out.as_slice()).unwrap();
        let mut original: Vec<String> = graph.iter().unwrap().map(|t| t.to_string()).collect();
        let mut copied: Vec<String> = copy.iter().unwrap().map(|t| t.to_string()).collect();
        original.sort();
        copied.sort();
        assert_eq!(original, copied);
    }

    #[test]
    fn test_nquads_keep_contexts() {
        let registry = StoreRegistry::in_memory();
        let conj = registry.get_conjunctive_graph(None, None).unwrap();

        let nq = "<http://ex.org/a> <http://ex.org/p> <http://ex.org/o> <http://ex.org/g1> .\n\
                  <http://ex.org/a> <http://ex.org/p> <http://ex.org/o> .\n";
        assert_eq!(import_nquads(&conj, nq.as_bytes()).unwrap(), 2);
        assert_eq!(conj.contexts().unwrap().count(), 2);

        let mut out = Vec::new();
        export_nquads(&conj, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("<http://ex.org/g1>"));
    }

    #[test]
    fn test_syntax_error_adds_nothing() {
        let registry = StoreRegistry::in_memory();
        let graph = registry.get_named_graph(GraphName::DefaultGraph, None).unwrap();

        let broken = "<http://ex.org/a> <http://ex.org/p> .\n";
        assert!(matches!(
            import_ntriples(&graph, broken.as_bytes()),
            Err(SerializationError::Parse(_))
        ));
        assert!(graph.is_empty().unwrap());
    }
}
