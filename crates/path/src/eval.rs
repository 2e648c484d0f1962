//! Query evaluation
//!
//! Evaluation is a pure function of the query and the document: the same
//! inputs always yield the same nodes in the same order. Within a segment,
//! input nodes are visited in order and each node's selectors are applied
//! in the order written. Descendant segments visit nodes in pre-order.
//! Object members are visited in storage order.

use crate::query::{CmpOp, FilterExpr, FilterQuery, Operand, Query, Segment, Selector};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::trace;

impl Query {
    /// Select every node matched by this query, in result order
    ///
    /// Duplicates are kept: `$['a','a']` yields the same node twice.
    pub fn select<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let nodes = apply_segments(&self.segments, vec![root], root);
        trace!(target: "jsonkv::path", query = %self, matches = nodes.len(), "Evaluated path");
        nodes
    }

    /// First node matched by this query, if any
    pub fn select_first<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.select(root).into_iter().next()
    }
}

fn apply_segments<'a>(
    segments: &[Segment],
    input: Vec<&'a Value>,
    root: &'a Value,
) -> Vec<&'a Value> {
    segments
        .iter()
        .fold(input, |nodes, segment| apply_segment(segment, &nodes, root))
}

fn apply_segment<'a>(segment: &Segment, input: &[&'a Value], root: &'a Value) -> Vec<&'a Value> {
    let mut out = Vec::new();
    match segment {
        Segment::Child(selectors) => {
            for node in input {
                for selector in selectors {
                    apply_selector(selector, node, root, &mut out);
                }
            }
        }
        Segment::Descendant(selectors) => {
            let mut visited = Vec::new();
            for node in input {
                descendants(node, &mut visited);
            }
            for node in visited {
                for selector in selectors {
                    apply_selector(selector, node, root, &mut out);
                }
            }
        }
    }
    out
}

/// The node itself followed by all its descendants, pre-order
fn descendants<'a>(node: &'a Value, out: &mut Vec<&'a Value>) {
    out.push(node);
    for child in children(node) {
        descendants(child, out);
    }
}

fn children(node: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match node {
        Value::Array(items) => Box::new(items.iter()),
        Value::Object(map) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    }
}

fn apply_selector<'a>(
    selector: &Selector,
    node: &'a Value,
    root: &'a Value,
    out: &mut Vec<&'a Value>,
) {
    match selector {
        Selector::Name(name) => {
            if let Some(v) = node.as_object().and_then(|m| m.get(name)) {
                out.push(v);
            }
        }
        Selector::Index(index) => {
            if let Some(items) = node.as_array() {
                if let Some(i) = normalize_index(*index, items.len()) {
                    out.push(&items[i]);
                }
            }
        }
        Selector::Wildcard => out.extend(children(node)),
        Selector::Slice { start, end, step } => {
            if let Some(items) = node.as_array() {
                for i in slice_indices(*start, *end, step.unwrap_or(1), items.len()) {
                    out.push(&items[i]);
                }
            }
        }
        Selector::Filter(expr) => {
            out.extend(children(node).filter(|child| test(expr, child, root)));
        }
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let i = if index < 0 { len + index } else { index };
    (0..len).contains(&i).then_some(i as usize)
}

/// Indices selected by `start:end:step` over an array of `len` elements
///
/// Bounds are clamped to the array; a zero step selects nothing.
fn slice_indices(start: Option<i64>, end: Option<i64>, step: i64, len: usize) -> Vec<usize> {
    let len = len as i64;
    let bound = |i: i64| if i >= 0 { i } else { len + i };
    let mut out = Vec::new();
    match step.cmp(&0) {
        Ordering::Equal => {}
        Ordering::Greater => {
            let lower = bound(start.unwrap_or(0)).clamp(0, len);
            let upper = bound(end.unwrap_or(len)).clamp(0, len);
            let mut i = lower;
            while i < upper {
                out.push(i as usize);
                match i.checked_add(step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        }
        Ordering::Less => {
            let upper = bound(start.unwrap_or(len - 1)).clamp(-1, len - 1);
            let lower = end.map_or(-1, |e| bound(e).clamp(-1, len - 1));
            let mut i = upper;
            while lower < i {
                out.push(i as usize);
                match i.checked_add(step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        }
    }
    out
}

fn test(expr: &FilterExpr, current: &Value, root: &Value) -> bool {
    match expr {
        FilterExpr::Or(a, b) => test(a, current, root) || test(b, current, root),
        FilterExpr::And(a, b) => test(a, current, root) && test(b, current, root),
        FilterExpr::Not(a) => !test(a, current, root),
        FilterExpr::Exists(q) => !run_filter_query(q, current, root).is_empty(),
        FilterExpr::Compare { left, op, right } => {
            let l = operand_value(left, current, root);
            let r = operand_value(right, current, root);
            compare(l, *op, r)
        }
    }
}

fn run_filter_query<'a>(q: &FilterQuery, current: &'a Value, root: &'a Value) -> Vec<&'a Value> {
    let start = if q.relative { current } else { root };
    apply_segments(&q.segments, vec![start], root)
}

/// Value of a comparison operand, `None` when a query selects nothing
fn operand_value<'a>(
    operand: &'a Operand,
    current: &'a Value,
    root: &'a Value,
) -> Option<&'a Value> {
    match operand {
        Operand::Literal(v) => Some(v),
        Operand::Query(q) => run_filter_query(q, current, root).into_iter().next(),
    }
}

fn compare(left: Option<&Value>, op: CmpOp, right: Option<&Value>) -> bool {
    match op {
        CmpOp::Eq => equal(left, right),
        CmpOp::Ne => !equal(left, right),
        CmpOp::Lt => less(left, right),
        CmpOp::Gt => less(right, left),
        CmpOp::Le => less(left, right) || equal(left, right),
        CmpOp::Ge => less(right, left) || equal(left, right),
    }
}

fn equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => number_cmp(a, b) == Some(Ordering::Equal),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| values_equal(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().all(|(k, v)| y.get(k).map_or(false, |w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

/// Only numbers and strings are ordered; mixed types never compare
fn less(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (Some(a @ Value::Number(_)), Some(b @ Value::Number(_))) => {
            number_cmp(a, b) == Some(Ordering::Less)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a < b,
        _ => false,
    }
}

fn number_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}
