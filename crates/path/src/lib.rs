//! JSONPath resolution for jsonkv documents
//!
//! A path is parsed once into a [`Query`] and evaluated against a
//! document root, yielding borrowed nodes in a deterministic order.
//!
//! # Example
//!
//! ```
//! use jsonkv_path::Query;
//! use serde_json::json;
//!
//! let doc = json!({"a": [1, 2, {"b": "x"}]});
//! let q = Query::parse("$.a[*]").unwrap();
//! assert_eq!(q.select(&doc).len(), 3);
//!
//! // legacy dotted paths are accepted by default
//! let q = Query::parse("a[2].b").unwrap();
//! assert_eq!(q.select(&doc), vec![&json!("x")]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
mod eval;
pub mod parser;
pub mod query;

pub use error::PathError;
pub use parser::{normalize_legacy, PathOptions};
pub use query::{CmpOp, FilterExpr, FilterQuery, Operand, Query, Segment, Selector};
