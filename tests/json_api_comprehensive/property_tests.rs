//! Property-based tests over random documents.

use crate::test_utils::*;
use proptest::prelude::*;

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1e6f64..1e6f64).prop_map(|f| json!(f)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-d]", inner), 0..5)
                .prop_map(|kv| Value::Object(kv.into_iter().collect())),
        ]
    })
}

fn arb_path() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "$",
        "$.*",
        "$..*",
        "$..a",
        "$[0]",
        "$[-1]",
        "$[1:3]",
        "$[::-1]",
        "$['a','b','a']",
        "$..[?@ == 1]",
        "$..[?@.a]",
        "$.*.*",
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn fuzz_query_is_deterministic(value in arb_json(), path in arb_path()) {
        let ks = keyspace_with(value);
        let ctx = ks.read();
        let doc = open_key(&ctx, "doc").unwrap();

        let addresses = || -> Vec<*const Value> {
            doc.query(path)
                .unwrap()
                .map(|n| n.as_value() as *const Value)
                .collect()
        };
        let first = addresses();
        let second = addresses();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn fuzz_iterator_yields_exactly_len(
        value in arb_json(),
        path in arb_path(),
        extra in 1usize..5
    ) {
        let ks = keyspace_with(value);
        let ctx = ks.read();
        let doc = open_key(&ctx, "doc").unwrap();

        let mut iter = doc.query(path).unwrap();
        let len = iter.len();
        for _ in 0..len {
            prop_assert!(iter.next().is_some());
        }
        for _ in 0..extra {
            prop_assert!(iter.next().is_none());
        }
        prop_assert_eq!(iter.len(), len);
    }

    #[test]
    fn fuzz_get_at_bounds(
        items in prop::collection::vec(any::<i64>(), 0..20),
        index in any::<usize>()
    ) {
        let ks = keyspace_with(json!(items));
        let ctx = ks.read();
        let doc = open_key(&ctx, "doc").unwrap();

        match doc.get_at(index) {
            Ok(node) => {
                prop_assert!(index < items.len());
                prop_assert_eq!(node.get_int().unwrap(), items[index]);
            }
            Err(e) => {
                prop_assert!(index >= items.len());
                prop_assert!(e.is_out_of_range());
            }
        }
    }

    #[test]
    fn fuzz_get_json_reparses_to_same_value(value in arb_json()) {
        let ks = keyspace_with(value.clone());
        let ctx = ks.read();
        let doc = open_key(&ctx, "doc").unwrap();

        let text = doc.get_json().unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(reparsed, value);
    }

    #[test]
    fn fuzz_exactly_one_accessor_family_accepts(value in arb_json()) {
        let node = Node::new(&value);
        let accepted = [
            node.get_int().is_ok(),
            node.get_double().is_ok(),
            node.get_boolean().is_ok(),
            node.get_string().is_ok(),
            node.get_len().is_ok(),
        ]
        .iter()
        .filter(|ok| **ok)
        .count();
        let expected = if node.get_type() == JsonType::Null { 0 } else { 1 };
        prop_assert_eq!(accepted, expected);
    }
}
