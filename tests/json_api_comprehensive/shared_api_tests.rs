//! Shared API tests
//!
//! A consumer that only knows the table's name and type resolves it from a
//! registry and drives every operation through it.

use crate::test_utils::*;
use jsonkv::{export_shared_api, ApiRegistry, JSON_API_V1_NAME};

/// Walk every match of `path` in `key` using only the table.
fn sum_ints(api: &JsonApiV1, ks: &Keyspace, key: &str, path: &str) -> Option<i64> {
    let ctx = ks.read();
    let doc = (api.open_key_from_str)(&ctx, key)?;
    let mut iter = (api.query)(doc, path)?;
    let mut total = 0;
    while let Some(node) = (api.next)(&mut iter) {
        let mut v = 0;
        if (api.get_int)(node, &mut v) == Status::Ok {
            total += v;
        }
    }
    (api.free_iter)(iter);
    Some(total)
}

#[test]
fn test_consumer_resolves_table_by_name() {
    init_tracing();
    let registry = ApiRegistry::new();
    assert!(export_shared_api(&registry));

    let api = registry.get::<JsonApiV1>(JSON_API_V1_NAME).unwrap();
    let ks = keyspace_with(json!({"a": [1, 2, {"b": 3}], "c": 4}));

    assert_eq!(sum_ints(api, &ks, "doc", "$..*"), Some(10));
    assert_eq!(sum_ints(api, &ks, "doc", "$.a[*]"), Some(3));
    assert_eq!(sum_ints(api, &ks, "missing", "$"), None);
    assert_eq!(sum_ints(api, &ks, "str", "$"), None);
    assert_eq!(sum_ints(api, &ks, "doc", "$["), None);
}

#[test]
fn test_table_covers_every_operation() {
    let api = &JSON_API_V1;
    let ks = keyspace_with(all_types_doc());
    let ctx = ks.read();

    assert!((api.is_json)(&ctx.open_raw("doc").unwrap()));
    assert!(!(api.is_json)(&ctx.open_raw("list").unwrap()));

    let doc = (api.open_key)(&ctx, "doc").unwrap();
    let iter = (api.query)(doc, "$.a").unwrap();
    assert_eq!((api.len)(&iter), 1);
    (api.free_iter)(iter);

    let a = doc.get_first("$.a").unwrap().unwrap();
    let mut len = 0;
    assert_eq!((api.get_len)(a, &mut len), Status::Ok);
    let last = (api.get_at)(a, len - 1).unwrap();
    assert_eq!((api.get_type)(last), JsonType::Int);
    assert!((api.get_at)(a, len).is_none());

    let mut json_text = String::from("untouched");
    assert_eq!((api.get_json)(last, &mut json_text), Status::Ok);
    assert_eq!(json_text, "30");

    let mut d = 0.0;
    assert_eq!((api.get_double)(node_at(&doc, "$.d"), &mut d), Status::Ok);
    assert_eq!(d, 2.5);

    let mut flag = true;
    assert_eq!((api.get_boolean)(node_at(&doc, "$.f"), &mut flag), Status::Ok);
    assert!(!flag);

    let mut s = "";
    assert_eq!((api.get_string)(node_at(&doc, "$.s"), &mut s), Status::Ok);
    assert_eq!(s, "text");
}

#[test]
fn test_global_registry_exports_once() {
    init_tracing();
    let registry = ApiRegistry::global();
    // another test in this binary may have exported already
    export_shared_api(registry);
    assert!(!export_shared_api(registry));
    assert!(registry.get::<JsonApiV1>(JSON_API_V1_NAME).is_some());
}

#[test]
fn test_table_is_copyable_across_threads() {
    let api: JsonApiV1 = JSON_API_V1;
    let ks = std::sync::Arc::new(keyspace_with(scenario_doc()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ks = ks.clone();
            std::thread::spawn(move || sum_ints(&api, &ks, "doc", "$.a[*]"))
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), Some(3));
    }
}
