#![cfg(feature = "rocksdb")]

use samyama_quadstore::rdf::{GraphName, Literal, NamedNode, RdfObject, Triple, TriplePattern, RDF_NAMESPACE, XML_NAMESPACE};
use samyama_quadstore::{StoreConfig, StoreRegistry};
use tempfile::TempDir;

fn ex(local: &str) -> NamedNode {
    NamedNode::new(&format!("http://www.example.com/{}", local)).unwrap()
}

#[test]
fn test_quads_and_bindings_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::rocksdb(temp_dir.path().join("data"));

    {
        let registry = StoreRegistry::from_config(&config).unwrap();
        let g1 = registry.get_named_graph(ex("g1"), Some("zoo")).unwrap();
        let conj = registry.get_conjunctive_graph(Some("zoo"), None).unwrap();

        g1.add(&Triple::new(ex("artis"), ex("open"), Literal::new_boolean(false)))
            .unwrap();
        conj.add(&Triple::new(ex("artis"), ex("name"), Literal::new_simple_literal("")))
            .unwrap();
        g1.bind("ex", &ex("")).unwrap();
    }

    let registry = StoreRegistry::from_config(&config).unwrap();
    let conj = registry.get_conjunctive_graph(Some("zoo"), None).unwrap();

    assert_eq!(conj.len().unwrap(), 2);
    assert_eq!(conj.contexts().unwrap().count(), 2);
    assert_eq!(
        conj.value(ex("artis"), ex("open")).unwrap(),
        Some(RdfObject::from(Literal::new_boolean(false)))
    );
    assert_eq!(
        conj.default_context().value(ex("artis"), ex("name")).unwrap(),
        Some(RdfObject::from(Literal::new_simple_literal("")))
    );

    // Defaults were seeded twice, once per open, but stored once
    let namespaces: Vec<_> = conj.namespaces().unwrap().collect();
    assert_eq!(namespaces.len(), 4);
    assert_eq!(
        namespaces.iter().filter(|ns| ns.prefix == RDF_NAMESPACE.0).count(),
        1
    );
    assert_eq!(conj.namespace_manager().lookup("ex").unwrap(), Some(ex("")));
}

#[test]
fn test_default_bindings_stay_fixed_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config = StoreConfig::rocksdb(temp_dir.path().join("data"));
    let xml_iri = NamedNode::new(XML_NAMESPACE.1).unwrap();

    {
        let registry = StoreRegistry::from_config(&config).unwrap();
        registry.get_conjunctive_graph(Some("zoo"), None).unwrap();
    }

    // Defaults are now read back from disk with their fixed flag
    let registry = StoreRegistry::from_config(&config).unwrap();
    let conj = registry.get_conjunctive_graph(Some("zoo"), None).unwrap();
    conj.bind("xml", &ex("xml")).unwrap();
    conj.bind("hello-world", &xml_iri).unwrap();

    let manager = conj.namespace_manager();
    assert_eq!(manager.lookup("xml").unwrap(), Some(xml_iri.clone()));
    assert_eq!(manager.lookup("hello-world").unwrap(), None);
    assert_eq!(manager.reverse_lookup(&xml_iri).unwrap(), Some("xml".to_string()));
    assert_eq!(conj.namespaces().unwrap().count(), 3);

    // Still fixed after another restart
    drop(conj);
    drop(manager);
    drop(registry);
    let registry = StoreRegistry::from_config(&config).unwrap();
    let conj = registry.get_conjunctive_graph(Some("zoo"), None).unwrap();
    assert_eq!(conj.namespace_manager().lookup("xml").unwrap(), Some(xml_iri));
    assert_eq!(conj.namespaces().unwrap().count(), 3);
}

#[test]
fn test_persistent_stores_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    let registry = StoreRegistry::from_config(&StoreConfig::rocksdb(temp_dir.path())).unwrap();

    let a = registry.get_named_graph(GraphName::DefaultGraph, Some("a")).unwrap();
    // A store id that is a prefix of another must not see its quads
    let ab = registry.get_named_graph(GraphName::DefaultGraph, Some("ab")).unwrap();

    a.add(&Triple::new(ex("s"), ex("p"), ex("o"))).unwrap();
    ab.add(&Triple::new(ex("s"), ex("p"), ex("other"))).unwrap();

    assert_eq!(a.len().unwrap(), 1);
    assert_eq!(ab.len().unwrap(), 1);

    a.remove(&TriplePattern::any()).unwrap();
    assert!(a.is_empty().unwrap());
    assert_eq!(ab.len().unwrap(), 1);
}
