//! Values held under keyspace keys
//!
//! A key holds one of several kinds of value. Only JSON documents are
//! visible to the access API; the other kinds exist so that JSON-only
//! operations can be shown to reject them.

use jsonkv_core::JsonValue;
use std::collections::VecDeque;
use std::fmt;

/// Kind of value stored under a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// A JSON document
    Json,
    /// A plain byte string
    String,
    /// A list of byte strings
    List,
}

impl KeyType {
    /// Name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Json => "json",
            KeyType::String => "string",
            KeyType::List => "list",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a stored value
#[derive(Debug, Clone, PartialEq)]
pub enum StoredData {
    /// A JSON document
    Json(JsonValue),
    /// A plain byte string
    String(Vec<u8>),
    /// A list of byte strings, head first
    List(VecDeque<Vec<u8>>),
}

/// A value plus the keyspace version of its last write
#[derive(Debug, Clone, PartialEq)]
pub struct StoredValue {
    data: StoredData,
    version: u64,
}

impl StoredValue {
    /// Create a stored value written at `version`
    pub fn new(data: StoredData, version: u64) -> Self {
        StoredValue { data, version }
    }

    /// Kind of value
    pub fn key_type(&self) -> KeyType {
        match self.data {
            StoredData::Json(_) => KeyType::Json,
            StoredData::String(_) => KeyType::String,
            StoredData::List(_) => KeyType::List,
        }
    }

    /// Payload
    pub fn data(&self) -> &StoredData {
        &self.data
    }

    /// Version of the last write
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The JSON document, if this is one
    pub fn as_json(&self) -> Option<&JsonValue> {
        match &self.data {
            StoredData::Json(doc) => Some(doc),
            _ => None,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut StoredData {
        &mut self.data
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}
