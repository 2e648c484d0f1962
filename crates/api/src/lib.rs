//! Read-only JSON document access API
//!
//! This crate is how in-process components read JSON documents held in a
//! [`Keyspace`]:
//! - **Document**: a borrowed handle on a stored document or a node in it
//! - **ResultsIterator**: single-pass cursor over the matches of a path
//! - **Node**: typed extraction (`get_int`, `get_string`, `get_json`, ...)
//! - **JsonApiV1**: the same operations as a versioned function table,
//!   published through an [`ApiRegistry`]
//!
//! Everything borrows from a [`ReadContext`], so no handle outlives the
//! read lock and no writer can run while one is alive.
//!
//! ## Quick Start
//!
//! ```
//! use jsonkv_api::{open_key, JsonType, Keyspace};
//! use serde_json::json;
//!
//! let ks = Keyspace::new();
//! ks.write().set_json("doc", json!({"a": [1, 2, {"b": "x"}]})).unwrap();
//!
//! let ctx = ks.read();
//! let doc = open_key(&ctx, "doc").unwrap();
//!
//! let mut iter = doc.query("$.a[2].b").unwrap();
//! assert_eq!(iter.len(), 1);
//! let b = iter.next().unwrap();
//! assert_eq!(b.get_string().unwrap(), "x");
//!
//! let third = doc.open_from_path("$.a").unwrap().get_at(2).unwrap();
//! assert_eq!(third.get_type(), JsonType::Object);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod iter;
pub mod registry;
pub mod v1;

pub use document::{is_json, mget, open_key, open_key_from_str, Document};
pub use iter::ResultsIterator;
pub use registry::{export_shared_api, ApiRegistry};
pub use v1::{JsonApiV1, Status, JSON_API_V1, JSON_API_V1_NAME};

pub use jsonkv_core::{
    Error, JsonFormat, JsonType, JsonValue, Node, NodeKind, Result, JSON_TYPE_EOF,
};
pub use jsonkv_storage::{
    ConfigError, KeyHandle, KeyType, Keyspace, KeyspaceConfig, ReadContext, WriteContext,
    CONFIG_FILE_NAME,
};
