//! Core types for jsonkv
//!
//! This crate defines the value model shared by every other crate:
//! - JsonType: the seven-way node discriminant
//! - JsonValue: the document stored under a keyspace key
//! - Node / NodeKind: borrowed, read-only views with typed accessors
//! - Error: the error taxonomy of the access API
//! - Limits: document, key and path limits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod limits;
pub mod node;

pub use error::{Error, Result};
pub use json::{JsonType, JsonValue, JSON_TYPE_EOF};
pub use limits::{
    LimitError, Limits, MAX_ARRAY_SIZE, MAX_DOCUMENT_SIZE, MAX_KEY_BYTES, MAX_NESTING_DEPTH,
    MAX_PATH_LENGTH,
};
pub use node::{JsonFormat, Node, NodeKind};
