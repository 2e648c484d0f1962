//! jsonkv - read-only access to JSON documents held in a keyspace
//!
//! Callers open a document stored under a key, navigate it with path
//! expressions, walk multi-match results with an iterator, and extract
//! typed data from individual nodes without copying the document.
//!
//! # Quick Start
//!
//! ```
//! use jsonkv::{open_key, Keyspace};
//! use serde_json::json;
//!
//! let ks = Keyspace::new();
//! ks.write().set_json("user:1", json!({"name": "Ada", "langs": ["en", "fr"]})).unwrap();
//!
//! let ctx = ks.read();
//! let user = open_key(&ctx, "user:1").unwrap();
//! let langs: Vec<&str> = user
//!     .query("$.langs[*]")
//!     .unwrap()
//!     .map(|n| n.get_string().unwrap())
//!     .collect();
//! assert_eq!(langs, ["en", "fr"]);
//! ```
//!
//! # Architecture
//!
//! - `jsonkv-core`: value model, error taxonomy, limits
//! - `jsonkv-path`: path parser and evaluator
//! - `jsonkv-storage`: the keyspace and its configuration
//! - `jsonkv-api`: documents, iterators and the versioned function table
//!
//! The API crate is re-exported at the root; the path resolver is
//! available as [`path`].

pub use jsonkv_api::*;

/// Path expression parser and evaluator
pub mod path {
    pub use jsonkv_path::*;
}
