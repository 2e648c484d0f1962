//! Query Invariants
//!
//! **Invariant**: querying the same document with the same path yields the
//! same count and the same nodes in the same order, every time. Matches are
//! never reordered or deduplicated.

use crate::test_utils::*;

#[test]
fn test_invariant_query_is_deterministic() {
    let ks = keyspace_with(all_types_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    for path in ["$", "$.*", "$..*", "$.a[*]", "$.a[::-1]", "$..[?@ > 5]"] {
        let first: Vec<Node<'_>> = doc.query(path).unwrap().collect();
        let second: Vec<Node<'_>> = doc.query(path).unwrap().collect();
        assert_eq!(first.len(), second.len(), "path {}", path);
        for (a, b) in first.iter().zip(&second) {
            // same node, not merely an equal value
            assert!(std::ptr::eq(a.as_value(), b.as_value()), "path {}", path);
        }
    }
}

#[test]
fn test_invariant_wildcard_follows_storage_order() {
    let ks = keyspace_with(json!({"z": 1, "a": 2, "m": 3}));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();
    assert_eq!(match_texts(&doc, "$.*"), vec!["1", "2", "3"]);
}

#[test]
fn test_invariant_duplicates_are_kept() {
    let ks = keyspace_with(json!({"a": 1}));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();
    let iter = doc.query("$['a','a','a']").unwrap();
    assert_eq!(iter.len(), 3);
}

#[test]
fn test_invariant_no_match_is_empty_not_error() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let mut iter = doc.query("$.missing[0]").unwrap();
    assert_eq!(iter.len(), 0);
    assert!(iter.next().is_none());
}

#[test]
fn test_invalid_path_is_reported() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    for path in ["$[", "$.a[?", "$['x", "$..", "$.a[1:2:x]"] {
        assert!(
            matches!(doc.query(path), Err(Error::InvalidPath { .. })),
            "path {}",
            path
        );
    }
}

#[test]
fn test_filters_and_descendants() {
    let ks = keyspace_with(json!({
        "books": [
            {"title": "A", "price": 8},
            {"title": "B", "price": 15, "tags": ["x"]},
            {"title": "C", "price": 30}
        ]
    }));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    assert_eq!(
        match_texts(&doc, "$.books[?@.price > 10].title"),
        vec![r#""B""#, r#""C""#]
    );
    assert_eq!(match_texts(&doc, "$.books[?@.tags].title"), vec![r#""B""#]);
    assert_eq!(match_texts(&doc, "$..title").len(), 3);
}

#[test]
fn test_hostile_paths_fail_locally() {
    let ks = keyspace_with(json!([0, 1, 2]));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let deep_not = format!("$[?{}@.a]", "!".repeat(100_000));
    let deep_parens = format!("$[?{}@.a{}]", "(".repeat(100_000), ")".repeat(100_000));
    let deep_filters = format!("${}{}", "[?@".repeat(50_000), "]".repeat(50_000));
    for path in [&deep_not, &deep_parens, &deep_filters] {
        assert!(matches!(doc.query(path), Err(Error::Limit(_))));
        assert!((JSON_API_V1.query)(doc, path).is_none());
    }

    assert_eq!(match_texts(&doc, "$[1::9223372036854775807]"), vec!["1"]);
    assert_eq!(match_texts(&doc, "$[::-9223372036854775808]"), vec!["2"]);
}

#[test]
fn test_multi_path_and_multi_key_reads() {
    let ks = keyspace_with(scenario_doc());
    ks.write().set_json("other", json!({"a": [9]})).unwrap();
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let text = doc
        .get_json_paths(&["$.a[2].b", "$.a[0]", "$.nope"], &JsonFormat::default())
        .unwrap();
    assert_eq!(text, r#"{"$.a[2].b":"x","$.a[0]":1,"$.nope":null}"#);

    let firsts: Vec<Option<String>> = mget(&ctx, &["doc", "other", "str", "gone"], "$.a[0]")
        .unwrap()
        .into_iter()
        .map(|n| n.map(|n| n.get_json().unwrap()))
        .collect();
    assert_eq!(
        firsts,
        vec![Some("1".to_string()), Some("9".to_string()), None, None]
    );

    assert_eq!(doc.arr_index("$.a", &json!(2), 0, 0).unwrap(), Some(1));
    assert_eq!(doc.arr_index("$.a", &json!(2.0), 0, 0).unwrap(), Some(-1));
}
