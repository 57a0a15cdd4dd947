use samyama_quadstore::rdf::{NamedNode, Triple, TriplePattern};
use samyama_quadstore::{
    get_conjunctive_graph, get_named_graph, BackendConfig, StoreConfig, StoreRegistry,
};
use std::collections::HashSet;

fn ex(local: &str) -> NamedNode {
    NamedNode::new(&format!("https://www.example.com/{}", local)).unwrap()
}

fn t(s: &str) -> Triple {
    Triple::new(ex(s), ex(s), ex(s))
}

// The only test in this binary that touches the process-wide registry
#[test]
fn test_conjunctive_and_named_graphs() {
    let g1 = get_named_graph(ex("g1"), None).unwrap();
    let g2 = get_conjunctive_graph(None, None).unwrap();
    let g1_s2 = get_named_graph(ex("g1"), Some("s2")).unwrap();
    let g3 = get_conjunctive_graph(Some("s2"), None).unwrap();
    let g4 = get_named_graph(ex("g4"), Some("s3")).unwrap();
    let g5 = get_conjunctive_graph(Some("s3"), Some(ex("g4").into())).unwrap();

    g1.add(&t("a")).unwrap();
    g2.add(&t("b")).unwrap();
    g1_s2.add(&t("c")).unwrap();
    g3.add(&t("d")).unwrap();
    g4.add(&t("x")).unwrap();
    g5.add(&t("y")).unwrap();

    assert_eq!(g1.len().unwrap(), 1);
    assert_eq!(g1_s2.len().unwrap(), 1);
    assert_eq!(g2.len().unwrap(), 2);
    assert_eq!(g3.len().unwrap(), 2);
    assert_eq!(g4.len().unwrap(), 2);

    let set = |it: samyama_quadstore::store::TripleIterator| it.collect::<HashSet<Triple>>();
    assert_eq!(set(g1.iter().unwrap()), HashSet::from([t("a")]));
    assert_eq!(set(g2.iter().unwrap()), HashSet::from([t("a"), t("b")]));
    assert_eq!(set(g1_s2.iter().unwrap()), HashSet::from([t("c")]));
    assert_eq!(set(g3.iter().unwrap()), HashSet::from([t("c"), t("d")]));
    assert_eq!(set(g4.iter().unwrap()), set(g5.iter().unwrap()));

    g2.remove(&TriplePattern::any()).unwrap();

    assert_eq!(g1.iter().unwrap().count(), 0);
    assert_eq!(g2.iter().unwrap().count(), 0);
    assert_eq!(g1_s2.iter().unwrap().collect::<Vec<_>>(), vec![t("c")]);
}

#[test]
fn test_store_isolation() {
    let registry = StoreRegistry::in_memory();
    let a = registry.get_named_graph(ex("g"), Some("a")).unwrap();
    let b = registry.get_named_graph(ex("g"), Some("b")).unwrap();

    a.add(&t("one")).unwrap();
    b.add(&t("two")).unwrap();
    a.add(&t("three")).unwrap();

    assert_eq!(a.len().unwrap(), 2);
    assert_eq!(b.len().unwrap(), 1);
    assert!(!a.contains(&t("two")).unwrap());
    assert!(!b.contains(&t("one")).unwrap());
    assert_eq!(registry.store_ids().unwrap(), vec!["a", "b"]);
}

#[test]
fn test_same_identifier_shares_state() {
    let registry = StoreRegistry::in_memory();
    let first = registry.get_named_graph(ex("g"), Some("shared")).unwrap();
    let second = registry.get_named_graph(ex("g"), Some("shared")).unwrap();

    first.add(&t("a")).unwrap();
    assert!(second.contains(&t("a")).unwrap());

    second.remove(&TriplePattern::any()).unwrap();
    assert!(first.is_empty().unwrap());
}

#[test]
fn test_registry_from_config() {
    let config = StoreConfig::from_yaml_str("default_store_id: main\n").unwrap();
    assert_eq!(config.backend, BackendConfig::Memory);

    let registry = StoreRegistry::from_config(&config).unwrap();
    let conj = registry.get_conjunctive_graph(None, None).unwrap();
    assert_eq!(conj.store_id(), "main");
    assert_eq!(registry.backend().name(), "memory");
}
