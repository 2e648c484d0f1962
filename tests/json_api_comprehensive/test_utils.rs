//! Shared fixtures for the JSON access API suite.

#![allow(dead_code)]

pub use jsonkv::{
    is_json, mget, open_key, open_key_from_str, Document, Error, JsonApiV1, JsonFormat, JsonType,
    Keyspace, KeyspaceConfig, Node, NodeKind, ResultsIterator, Status, JSON_API_V1, JSON_TYPE_EOF,
};
pub use serde_json::{json, Value};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output to the test harness, once per binary.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    });
}

/// The scenario document used throughout the suite.
pub fn scenario_doc() -> Value {
    json!({"a": [1, 2, {"b": "x"}]})
}

/// A document exercising every node type.
pub fn all_types_doc() -> Value {
    json!({
        "s": "text",
        "i": 42,
        "d": 2.5,
        "t": true,
        "f": false,
        "o": {"k": "v"},
        "a": [10, 20, 30],
        "n": null
    })
}

/// Keyspace holding `doc` as JSON, plus a string and a list key.
pub fn keyspace_with(doc: Value) -> Keyspace {
    init_tracing();
    let ks = Keyspace::new();
    {
        let mut w = ks.write();
        w.set_json("doc", doc).expect("store doc");
        w.set_string("str", "plain").expect("store string");
        w.push_list("list", "item").expect("store list");
    }
    ks
}

/// Collect the JSON text of every match.
pub fn match_texts(doc: &Document<'_>, path: &str) -> Vec<String> {
    doc.query(path)
        .expect("valid path")
        .map(|n| n.get_json().expect("serializable"))
        .collect()
}

/// First match of `path`, which must exist.
pub fn node_at<'a>(doc: &Document<'a>, path: &str) -> Node<'a> {
    doc.get_first(path)
        .expect("valid path")
        .unwrap_or_else(|| panic!("no match for {}", path))
}
