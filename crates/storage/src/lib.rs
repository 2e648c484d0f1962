//! Keyspace for jsonkv
//!
//! This crate provides the store the access API reads from:
//! - Keyspace: key names mapped to JSON documents, strings or lists
//! - ReadContext / WriteContext: lock-scoped access to the keyspace
//! - KeyspaceConfig: settings loaded from `jsonkv.toml`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod keyspace;
pub mod stored_value;

pub use config::{ConfigError, KeyspaceConfig, CONFIG_FILE_NAME};
pub use keyspace::{KeyHandle, Keyspace, ReadContext, WriteContext};
pub use stored_value::{KeyType, StoredData, StoredValue};
