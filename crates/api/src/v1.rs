//! Version 1 of the shared JSON access API
//!
//! [`JsonApiV1`] is a table of plain function pointers published under
//! [`JSON_API_V1_NAME`]. Consumers look the table up by name in an
//! [`ApiRegistry`](crate::ApiRegistry) and call through it, so they never
//! link against this crate's types beyond the table itself. A later
//! revision is published under a new name and the two coexist.
//!
//! ## Contract
//!
//! | Operation | Valid on | On failure |
//! |-----------|----------|------------|
//! | `open_key`, `open_key_from_str` | JSON key | `None` |
//! | `query` | valid path | `None` |
//! | `next` | iterator | `None` at end, forever |
//! | `len` | iterator | never fails |
//! | `free_iter` | iterator | never fails |
//! | `get_at` | Array, Object | `None` |
//! | `get_len` | Array, Object | `Status::Err` |
//! | `get_type` | any | never fails |
//! | `get_int` | Int | `Status::Err` |
//! | `get_double` | Double | `Status::Err` |
//! | `get_boolean` | Bool | `Status::Err` |
//! | `get_string` | String | `Status::Err` |
//! | `get_json` | any | `Status::Err` |
//! | `is_json` | raw key | never fails |
//!
//! Operations returning [`Status`] write their output parameter only when
//! they return `Status::Ok`.

use crate::document::{self, Document};
use crate::iter::ResultsIterator;
use jsonkv_core::{JsonType, Node, Result};
use jsonkv_storage::{KeyHandle, ReadContext};
use tracing::trace;

/// Name the V1 table is published under
pub const JSON_API_V1_NAME: &str = "JsonApi_V1";

/// Two-valued outcome of a validating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// The output parameter was written
    Ok = 0,
    /// The output parameter is untouched
    Err = 1,
}

impl Status {
    /// Check for `Status::Ok`
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

/// Function table of the V1 JSON access API
#[derive(Clone, Copy)]
pub struct JsonApiV1 {
    /// Open the document under a key
    pub open_key: for<'a, 'k> fn(&'a ReadContext<'k>, &str) -> Option<Document<'a>>,
    /// Open the document under a key given as plain text
    pub open_key_from_str: for<'a, 'k> fn(&'a ReadContext<'k>, &str) -> Option<Document<'a>>,
    /// Run a path query
    pub query: for<'a> fn(Document<'a>, &str) -> Option<ResultsIterator<'a>>,
    /// Advance an iterator
    pub next: for<'a, 'i> fn(&'i mut ResultsIterator<'a>) -> Option<Node<'a>>,
    /// Total match count of an iterator
    pub len: for<'a, 'i> fn(&'i ResultsIterator<'a>) -> usize,
    /// Release an iterator
    pub free_iter: for<'a> fn(ResultsIterator<'a>),
    /// Child of an Array or Object by position
    pub get_at: for<'a> fn(Node<'a>, usize) -> Option<Node<'a>>,
    /// Element count of an Array or Object
    pub get_len: for<'a, 'o> fn(Node<'a>, &'o mut usize) -> Status,
    /// Discriminant of a node
    pub get_type: for<'a> fn(Node<'a>) -> JsonType,
    /// Value of an Int node
    pub get_int: for<'a, 'o> fn(Node<'a>, &'o mut i64) -> Status,
    /// Value of a Double node
    pub get_double: for<'a, 'o> fn(Node<'a>, &'o mut f64) -> Status,
    /// Value of a Bool node
    pub get_boolean: for<'a, 'o> fn(Node<'a>, &'o mut bool) -> Status,
    /// Borrowed text of a String node; the length is `str::len`
    pub get_string: for<'a, 'o> fn(Node<'a>, &'o mut &'a str) -> Status,
    /// Compact JSON text of any node, owned by the caller
    pub get_json: for<'a, 'o> fn(Node<'a>, &'o mut String) -> Status,
    /// Whether a raw key holds a JSON document
    pub is_json: for<'a, 'h> fn(&'h KeyHandle<'a>) -> bool,
}

impl std::fmt::Debug for JsonApiV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonApiV1").finish_non_exhaustive()
    }
}

/// The V1 table
pub static JSON_API_V1: JsonApiV1 = JsonApiV1 {
    open_key: json_api_open_key,
    open_key_from_str: json_api_open_key_from_str,
    query: json_api_query,
    next: json_api_next,
    len: json_api_len,
    free_iter: json_api_free_iter,
    get_at: json_api_get_at,
    get_len: json_api_get_len,
    get_type: json_api_get_type,
    get_int: json_api_get_int,
    get_double: json_api_get_double,
    get_boolean: json_api_get_boolean,
    get_string: json_api_get_string,
    get_json: json_api_get_json,
    is_json: json_api_is_json,
};

/// Write `result` to `out` on success, leave `out` alone on failure
fn write_out<T>(op: &'static str, result: Result<T>, out: &mut T) -> Status {
    match result {
        Ok(v) => {
            *out = v;
            Status::Ok
        }
        Err(e) => {
            trace!(target: "jsonkv::api", op, error = %e, "Rejected");
            Status::Err
        }
    }
}

fn json_api_open_key<'a>(ctx: &'a ReadContext<'_>, key: &str) -> Option<Document<'a>> {
    document::open_key(ctx, key).ok()
}

fn json_api_open_key_from_str<'a>(ctx: &'a ReadContext<'_>, key: &str) -> Option<Document<'a>> {
    document::open_key_from_str(ctx, key).ok()
}

fn json_api_query<'a>(doc: Document<'a>, path: &str) -> Option<ResultsIterator<'a>> {
    doc.query(path)
        .map_err(|e| trace!(target: "jsonkv::api", path, error = %e, "Query rejected"))
        .ok()
}

fn json_api_next<'a>(iter: &mut ResultsIterator<'a>) -> Option<Node<'a>> {
    iter.next()
}

fn json_api_len(iter: &ResultsIterator<'_>) -> usize {
    iter.len()
}

fn json_api_free_iter(iter: ResultsIterator<'_>) {
    iter.free()
}

fn json_api_get_at(node: Node<'_>, index: usize) -> Option<Node<'_>> {
    node.get_at(index).ok()
}

fn json_api_get_len(node: Node<'_>, out: &mut usize) -> Status {
    write_out("get_len", node.get_len(), out)
}

fn json_api_get_type(node: Node<'_>) -> JsonType {
    node.get_type()
}

fn json_api_get_int(node: Node<'_>, out: &mut i64) -> Status {
    write_out("get_int", node.get_int(), out)
}

fn json_api_get_double(node: Node<'_>, out: &mut f64) -> Status {
    write_out("get_double", node.get_double(), out)
}

fn json_api_get_boolean(node: Node<'_>, out: &mut bool) -> Status {
    write_out("get_boolean", node.get_boolean(), out)
}

fn json_api_get_string<'a>(node: Node<'a>, out: &mut &'a str) -> Status {
    write_out("get_string", node.get_string(), out)
}

fn json_api_get_json(node: Node<'_>, out: &mut String) -> Status {
    write_out("get_json", node.get_json(), out)
}

fn json_api_is_json(handle: &KeyHandle<'_>) -> bool {
    document::is_json(handle)
}
