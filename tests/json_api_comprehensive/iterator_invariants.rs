//! Iterator Invariants
//!
//! **Invariant**: `next()` called `len()` times yields `len()` nodes, then
//! end-of-sequence on every later call. `len()` is fixed at creation.
//!
//! ## Released iterators
//!
//! Releasing an iterator consumes it (`free(self)`), so any later use is a
//! compile error rather than a runtime fault; see the `compile_fail`
//! example on `ResultsIterator::free`. There is no released-iterator state
//! left to observe at run time.

use crate::test_utils::*;

#[test]
fn test_invariant_exhaustion_is_permanent() {
    let ks = keyspace_with(all_types_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let mut iter = doc.query("$.*").unwrap();
    let len = iter.len();
    assert_eq!(len, 8);

    for i in 0..len {
        assert!(iter.next().is_some(), "node {} of {}", i, len);
        assert_eq!(iter.len(), len);
    }
    for _ in 0..10 {
        assert!(iter.next().is_none());
    }
    assert_eq!(iter.len(), len);
    assert_eq!(iter.remaining(), 0);
}

#[test]
fn test_invariant_len_does_not_track_progress() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let mut iter = doc.query("$.a[*]").unwrap();
    iter.next();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.position(), 1);
    assert_eq!(iter.remaining(), 2);
}

#[test]
fn test_invariant_release_is_independent_of_exhaustion() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    // released untouched
    doc.query("$.a[*]").unwrap().free();

    // released part way
    let mut partial = doc.query("$.a[*]").unwrap();
    partial.next();
    partial.free();

    // released after exhaustion
    let mut drained = doc.query("$.a[*]").unwrap();
    while drained.next().is_some() {}
    drained.free();

    // released by scope exit
    {
        let _scoped = doc.query("$.a[*]").unwrap();
    }
}

#[test]
fn test_nodes_outlive_their_iterator() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let first = {
        let mut iter = doc.query("$.a[*]").unwrap();
        let node = iter.next().unwrap();
        iter.free();
        node
    };
    // nodes borrow from the document, not from the iterator
    assert_eq!(first.get_int().unwrap(), 1);
}

#[test]
fn test_independent_iterators_do_not_interfere() {
    let ks = keyspace_with(scenario_doc());
    let ctx = ks.read();
    let doc = open_key(&ctx, "doc").unwrap();

    let mut a = doc.query("$.a[*]").unwrap();
    let mut b = doc.query("$.a[*]").unwrap();
    a.next();
    a.next();
    assert_eq!(b.next().unwrap().get_int().unwrap(), 1);
    assert_eq!(a.next().unwrap().get_type(), JsonType::Object);
}
