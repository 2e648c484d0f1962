//! End-to-end scenario over `{"a": [1, 2, {"b": "x"}]}`.

use crate::test_utils::*;

#[test]
fn test_invariant_scenario_path_yields_single_string() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let mut iter = doc.query("$.a[2].b").unwrap();
    assert_eq!(iter.len(), 1);

    let node = iter.next().unwrap();
    assert_eq!(node.get_type(), JsonType::String);
    let s = node.get_string().unwrap();
    assert_eq!(s, "x");
    assert_eq!(s.len(), 1);

    assert!(iter.next().is_none());
    iter.free();
}

#[test]
fn test_invariant_scenario_get_at_is_object() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let a = doc.open_from_path("$.a").unwrap();
    assert_eq!(a.get_type(), JsonType::Array);
    assert_eq!(a.get_len().unwrap(), 3);

    let third = a.get_at(2).unwrap();
    assert_eq!(third.get_type(), JsonType::Object);
    assert_eq!(third.get_len().unwrap(), 1);
}

#[test]
fn test_invariant_scenario_sub_document_queries() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    // a handle reached by path is itself a query root
    let a = doc.open_from_path("$.a").unwrap();
    assert_eq!(match_texts(&a, "$[*]"), vec!["1", "2", r#"{"b":"x"}"#]);
    assert_eq!(match_texts(&a, "$..b"), vec![r#""x""#]);
    assert_eq!(a.key(), Some("doc"));
}

#[test]
fn test_scenario_walk_with_node_kinds() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let mut ints = Vec::new();
    let mut strings = Vec::new();
    for node in doc.query("$..*").unwrap() {
        match node.kind() {
            NodeKind::Int(i) => ints.push(i),
            NodeKind::String(s) => strings.push(s),
            _ => {}
        }
    }
    assert_eq!(ints, vec![1, 2]);
    assert_eq!(strings, vec!["x"]);
}

#[test]
fn test_scenario_legacy_path_forms() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    for path in [".a[2].b", "a[2].b", "$.a[2].b", "$['a'][2]['b']", "$.a[-1].b"] {
        assert_eq!(match_texts(&doc, path), vec![r#""x""#], "path {}", path);
    }
}
