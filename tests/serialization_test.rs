use samyama_quadstore::rdf::serialization::{
    export_nquads, export_ntriples, import_nquads, import_ntriples,
};
use samyama_quadstore::rdf::{GraphName, NamedNode, TriplePattern};
use samyama_quadstore::{SerializationError, StoreRegistry};

const ZOOS: &str = r#"
<http://zoowizard.eu/resource/Artis> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Zoo> .
<http://zoowizard.eu/resource/Artis> <http://www.w3.org/2000/01/rdf-schema#label> "Artis" .
<http://zoowizard.eu/resource/Berlin_Zoo> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Zoo> .
<http://zoowizard.eu/resource/Berlin_Zoo> <http://www.w3.org/2000/01/rdf-schema#label> "Zoologischer Garten"@de .
<http://zoowizard.eu/resource/Berlin_Zoo> <http://www.example.com/founded> "1844"^^<http://www.w3.org/2001/XMLSchema#integer> .
"#;

fn node(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

#[test]
fn test_import_into_named_context() {
    let registry = StoreRegistry::in_memory();
    let zoos = registry
        .get_named_graph(node("http://www.example.com/zoos"), Some("io"))
        .unwrap();

    assert_eq!(import_ntriples(&zoos, ZOOS.as_bytes()).unwrap(), 5);

    let conj = registry.get_conjunctive_graph(Some("io"), None).unwrap();
    assert_eq!(conj.len().unwrap(), 5);
    assert_eq!(conj.contexts().unwrap().collect::<Vec<_>>(), vec![zoos.identifier().clone()]);

    let rdf_type = TriplePattern::any().with_object(node("http://schema.org/Zoo"));
    assert_eq!(zoos.triples(&rdf_type).unwrap().count(), 2);
}

#[test]
fn test_nquads_round_trip_between_stores() {
    let registry = StoreRegistry::in_memory();
    let source = registry.get_conjunctive_graph(Some("source"), None).unwrap();
    import_ntriples(&source.get_context(node("http://www.example.com/a")), ZOOS.as_bytes()).unwrap();
    import_ntriples(&source.default_context(), ZOOS.as_bytes()).unwrap();
    assert_eq!(source.len().unwrap(), 10);

    let mut dump = Vec::new();
    assert_eq!(export_nquads(&source, &mut dump).unwrap(), 10);

    let target = registry.get_conjunctive_graph(Some("target"), None).unwrap();
    assert_eq!(import_nquads(&target, dump.as_slice()).unwrap(), 10);
    assert_eq!(target.len().unwrap(), 10);
    assert_eq!(target.default_context().len().unwrap(), 5);
    assert_eq!(
        target.get_context(node("http://www.example.com/a")).len().unwrap(),
        5
    );
}

#[test]
fn test_export_single_context() {
    let registry = StoreRegistry::in_memory();
    let graph = registry
        .get_named_graph(GraphName::DefaultGraph, Some("export"))
        .unwrap();
    import_ntriples(&graph, ZOOS.as_bytes()).unwrap();
    registry
        .get_named_graph(node("http://www.example.com/other"), Some("export"))
        .unwrap()
        .add(&samyama_quadstore::Triple::new(
            node("http://www.example.com/s"),
            node("http://www.example.com/p"),
            node("http://www.example.com/o"),
        ))
        .unwrap();

    let mut out = Vec::new();
    assert_eq!(export_ntriples(&graph, &mut out).unwrap(), 5);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\"Zoologischer Garten\"@de"));
    assert!(!text.contains("http://www.example.com/s"));
}

#[test]
fn test_invalid_input_is_reported() {
    let registry = StoreRegistry::in_memory();
    let graph = registry.get_named_graph(GraphName::DefaultGraph, None).unwrap();

    let result = import_ntriples(&graph, "not n-triples at all\n".as_bytes());
    assert!(matches!(result, Err(SerializationError::Parse(_))));
    assert!(graph.is_empty().unwrap());
}
