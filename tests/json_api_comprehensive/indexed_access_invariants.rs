//! Indexed Access Invariants
//!
//! **Invariant**: for an Array of length L, `get_at(i)` succeeds exactly for
//! `0 <= i < L`. Indices at or past L, including negative values cast to
//! `usize`, fail with `OutOfRange`.

use crate::test_utils::*;

#[test]
fn test_invariant_get_at_bounds() {
    let ks = keyspace_with(json!([10, 20, 30, 40]));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();
    let len = doc.get_len().unwrap();

    for i in 0..len {
        let child = doc.get_at(i).unwrap();
        assert_eq!(child.get_int().unwrap(), 10 * (i as i64 + 1));
    }
    for i in [len, len + 1, 1000, usize::MAX, -1_isize as usize, -4_isize as usize] {
        assert_eq!(
            doc.get_at(i).unwrap_err(),
            Error::OutOfRange { index: i, len },
            "index {}",
            i
        );
    }
}

#[test]
fn test_invariant_get_at_on_empty_array() {
    let ks = keyspace_with(json!([]));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();
    assert!(doc.get_at(0).unwrap_err().is_out_of_range());
}

#[test]
fn test_get_at_on_object_uses_storage_order() {
    let ks = keyspace_with(json!({"z": "first", "a": "second"}));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    assert_eq!(doc.get_at(0).unwrap().get_string().unwrap(), "first");
    assert_eq!(doc.get_at(1).unwrap().get_string().unwrap(), "second");
    assert!(doc.get_at(2).unwrap_err().is_out_of_range());
}

#[test]
fn test_get_at_on_scalar_is_wrong_type() {
    let ks = keyspace_with(all_types_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    for path in ["$.s", "$.i", "$.d", "$.t", "$.n"] {
        assert!(
            node_at(&doc, path).get_at(0).unwrap_err().is_wrong_type(),
            "path {}",
            path
        );
    }
}

#[test]
fn test_get_at_agrees_with_index_path() {
    let ks = keyspace_with(json!([[1, 2], {"k": [3]}, "s"]));
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    for i in 0..3 {
        let direct = doc.get_at(i).unwrap();
        let by_path = node_at(&doc, &format!("$[{}]", i));
        assert!(std::ptr::eq(direct.as_value(), by_path.as_value()));
    }
}
