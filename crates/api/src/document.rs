//! Document handles
//!
//! A [`Document`] is a read capability on one JSON value: either the root
//! document stored under a key, or a node reached from another document by
//! a path. It is `Copy` and borrows from the [`ReadContext`] it was opened
//! in, so it can never outlive the read lock or observe a concurrent write.
//!
//! ## Opening
//!
//! | Call | Fails with |
//! |------|------------|
//! | [`open_key`] / [`open_key_from_str`] | `NotFound` (no such key), `WrongType` (key is not JSON) |
//! | [`Document::open_from_path`] | `InvalidPath`, `NotFound` (path selects nothing) |
//!
//! ## Path readers
//!
//! The `*_at` readers resolve a path and act on the first match. They
//! return `Ok(None)` when the path selects nothing and `WrongType` when the
//! first match has the wrong type. [`Document::arr_index`] follows the same
//! rule for a missing path but reports `-1` for anything it cannot search.
//!
//! ## Several paths or keys
//!
//! [`Document::get_json_paths`] renders several paths of one document as
//! one JSON object; [`mget`] reads one path across several keys.

use crate::iter::ResultsIterator;
use jsonkv_core::{Error, JsonFormat, JsonType, Node, NodeKind, Result};
use jsonkv_path::{PathError, PathOptions, Query};
use jsonkv_storage::{KeyHandle, KeyType, ReadContext};
use serde_json::{Map, Value};
use std::ops::Deref;
use tracing::{debug, trace};

/// Read-only handle on a JSON value inside the keyspace
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    node: Node<'a>,
    key: Option<&'a str>,
    options: PathOptions,
}

/// Open the JSON document stored under `key`
///
/// # Errors
///
/// - `NotFound` if the key does not exist
/// - `WrongType` if the key holds something other than JSON
pub fn open_key<'a>(ctx: &'a ReadContext<'_>, key: &str) -> Result<Document<'a>> {
    let handle = ctx.open_raw(key).ok_or_else(|| {
        debug!(target: "jsonkv::api", key, "Open failed: no such key");
        Error::not_found(key)
    })?;
    Document::from_handle(handle, context_options(ctx))
}

fn context_options(ctx: &ReadContext<'_>) -> PathOptions {
    PathOptions::from_limits(&ctx.config().limits, ctx.config().legacy_paths)
}

fn parse_path(path: &str, options: &PathOptions) -> Result<Query> {
    Query::parse_with(path, options).map_err(|e| match e {
        PathError::Limit(limit) => Error::Limit(limit),
        other => Error::InvalidPath {
            path: path.to_string(),
            reason: other.to_string(),
        },
    })
}

/// First match of `path` in each of `keys`, in key order
///
/// A key that is missing, holds something other than JSON, or has no match
/// yields `None` in its slot.
///
/// # Errors
///
/// `InvalidPath` or `Limit` if the path is rejected; no key is read then.
pub fn mget<'a>(
    ctx: &'a ReadContext<'_>,
    keys: &[&str],
    path: &str,
) -> Result<Vec<Option<Node<'a>>>> {
    let query = parse_path(path, &context_options(ctx))?;
    let nodes = keys
        .iter()
        .map(|key| {
            let doc = ctx.open_raw(key)?.as_json()?;
            query.select_first(doc.as_inner()).map(Node::new)
        })
        .collect::<Vec<_>>();
    trace!(
        target: "jsonkv::api",
        path,
        keys = keys.len(),
        found = nodes.iter().flatten().count(),
        "Multi-key read"
    );
    Ok(nodes)
}

/// Open the JSON document whose key name is given as plain text
///
/// The text is a key name, not a path; paths relative to a document are
/// resolved with [`Document::open_from_path`].
pub fn open_key_from_str<'a>(ctx: &'a ReadContext<'_>, key: &str) -> Result<Document<'a>> {
    open_key(ctx, key)
}

/// Check whether a raw key handle holds a JSON document; never fails
pub fn is_json(handle: &KeyHandle<'_>) -> bool {
    handle.key_type() == KeyType::Json
}

impl<'a> Document<'a> {
    fn from_handle(handle: KeyHandle<'a>, options: PathOptions) -> Result<Self> {
        match handle.as_json() {
            Some(doc) => Ok(Document {
                node: Node::from(doc),
                key: Some(handle.key()),
                options,
            }),
            None => {
                debug!(
                    target: "jsonkv::api",
                    key = handle.key(),
                    found = %handle.key_type(),
                    "Open failed: not a JSON key"
                );
                Err(Error::wrong_type(KeyType::Json.name(), handle.key_type().name()))
            }
        }
    }

    /// Document over a value not stored in a keyspace
    ///
    /// Uses the default path options.
    pub fn from_value(value: &'a Value) -> Self {
        Document {
            node: Node::new(value),
            key: None,
            options: PathOptions::default(),
        }
    }

    /// Key this document was opened from, if any
    ///
    /// Documents reached with [`open_from_path`](Self::open_from_path) keep
    /// the key of the document they came from.
    pub fn key(&self) -> Option<&'a str> {
        self.key
    }

    /// The node this document is rooted at
    pub fn node(&self) -> Node<'a> {
        self.node
    }

    /// Path options used by queries on this document
    pub fn path_options(&self) -> &PathOptions {
        &self.options
    }

    fn parse(&self, path: &str) -> Result<Query> {
        parse_path(path, &self.options)
    }

    /// Every node matched by `path`, in evaluation order
    ///
    /// Matches are neither reordered nor deduplicated. An empty result is
    /// not an error.
    ///
    /// # Errors
    ///
    /// `InvalidPath` if the path does not parse, `Limit` if it has too
    /// many segments or nests filters too deeply.
    pub fn query(&self, path: &str) -> Result<ResultsIterator<'a>> {
        let query = self.parse(path)?;
        let results = query.select(self.node.as_value());
        trace!(target: "jsonkv::api", key = ?self.key, path, matches = results.len(), "Query");
        Ok(ResultsIterator::new(results))
    }

    /// First node matched by `path`, if any
    pub fn get_first(&self, path: &str) -> Result<Option<Node<'a>>> {
        let query = self.parse(path)?;
        Ok(query.select_first(self.node.as_value()).map(Node::new))
    }

    /// Document rooted at the first node matched by `path`
    ///
    /// # Errors
    ///
    /// `NotFound` if the path selects nothing, `InvalidPath` if it does not
    /// parse.
    pub fn open_from_path(&self, path: &str) -> Result<Document<'a>> {
        match self.get_first(path)? {
            Some(node) => Ok(Document { node, ..*self }),
            None => {
                debug!(
                    target: "jsonkv::api",
                    key = ?self.key,
                    path,
                    "Open failed: path selects nothing"
                );
                Err(Error::not_found(path))
            }
        }
    }

    /// Type of the first match
    pub fn type_at(&self, path: &str) -> Result<Option<JsonType>> {
        Ok(self.get_first(path)?.map(|n| n.get_type()))
    }

    /// Member keys of the first match, which must be an Object
    pub fn obj_keys(&self, path: &str) -> Result<Option<Vec<&'a str>>> {
        self.get_first(path)?
            .map(|n| n.keys().map(Iterator::collect))
            .transpose()
    }

    /// Byte length of the first match, which must be a String
    pub fn str_len_at(&self, path: &str) -> Result<Option<usize>> {
        self.get_first(path)?.map(|n| n.str_len()).transpose()
    }

    /// Element count of the first match, which must be an Array
    pub fn arr_len_at(&self, path: &str) -> Result<Option<usize>> {
        self.len_at(path, JsonType::Array)
    }

    /// Member count of the first match, which must be an Object
    pub fn obj_len_at(&self, path: &str) -> Result<Option<usize>> {
        self.len_at(path, JsonType::Object)
    }

    /// Position of the first element equal to `value` in the first match
    ///
    /// Equality is by discriminant ([`Node::strict_eq`]), so `1` does not
    /// find `1.0`. The search covers `start..end` after normalization:
    /// a negative `start` counts from the end and a positive one is clamped
    /// to the last element; an `end` of `0` means the array length, a
    /// negative `end` counts from the end, and a positive one is clamped to
    /// the length.
    ///
    /// Returns `Some(-1)` when the match is not an Array, is empty, `end` is
    /// below `-1`, the range is empty, or nothing is equal. Returns `None`
    /// when the path selects nothing.
    pub fn arr_index(
        &self,
        path: &str,
        value: &Value,
        start: i64,
        end: i64,
    ) -> Result<Option<i64>> {
        let Some(node) = self.get_first(path)? else {
            return Ok(None);
        };
        let NodeKind::Array(items) = node.kind() else {
            return Ok(Some(-1));
        };
        if items.is_empty() || end < -1 {
            return Ok(Some(-1));
        }

        let len = items.len() as i64;
        let start = if start < 0 {
            (len + start).max(0)
        } else {
            start.min(len - 1)
        };
        let end = match end {
            0 => len,
            e if e < 0 => len + e,
            e => e.min(len),
        };

        let needle = Node::new(value);
        let found = (start..end)
            .find(|&i| Node::new(&items[i as usize]).strict_eq(&needle))
            .unwrap_or(-1);
        Ok(Some(found))
    }

    /// JSON text for several paths at once
    ///
    /// - No paths: the whole document.
    /// - One `$` path: an array of every match.
    /// - One legacy path (not starting with `$`): the first match, or
    ///   `NotFound` if there is none.
    /// - Several paths: an object mapping each path, as written, to its
    ///   first match or `null`. Paths that do not parse are left out and a
    ///   path given twice appears once.
    ///
    /// # Errors
    ///
    /// `InvalidPath` or `Limit` for a rejected single path,
    /// `AllocationFailure` if the output cannot be built.
    pub fn get_json_paths(&self, paths: &[&str], format: &JsonFormat) -> Result<String> {
        match paths {
            [] => self.node.get_json_formatted(format),
            [path] if path.starts_with('$') => {
                let matches = self
                    .query(path)?
                    .map(|n| n.as_value().clone())
                    .collect::<Vec<_>>();
                Node::new(&Value::Array(matches)).get_json_formatted(format)
            }
            [path] => match self.get_first(path)? {
                Some(node) => node.get_json_formatted(format),
                None => Err(Error::not_found(*path)),
            },
            _ => {
                let mut out = Map::new();
                for path in paths {
                    let Ok(query) = self.parse(path) else {
                        trace!(target: "jsonkv::api", path, "Skipping rejected path");
                        continue;
                    };
                    let first = query.select_first(self.node.as_value());
                    out.insert(path.to_string(), first.cloned().unwrap_or(Value::Null));
                }
                Node::new(&Value::Object(out)).get_json_formatted(format)
            }
        }
    }

    fn len_at(&self, path: &str, expected: JsonType) -> Result<Option<usize>> {
        let Some(node) = self.get_first(path)? else {
            return Ok(None);
        };
        match node.kind() {
            NodeKind::Array(arr) if expected == JsonType::Array => Ok(Some(arr.len())),
            NodeKind::Object(obj) if expected == JsonType::Object => Ok(Some(obj.len())),
            _ => Err(Error::wrong_type(expected.name(), node.get_type().name())),
        }
    }
}

impl<'a> Deref for Document<'a> {
    type Target = Node<'a>;

    fn deref(&self) -> &Node<'a> {
        &self.node
    }
}
