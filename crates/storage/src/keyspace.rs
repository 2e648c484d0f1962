//! In-memory keyspace
//!
//! A `Keyspace` maps key names to [`StoredValue`]s behind a single
//! `parking_lot::RwLock`. Access goes through contexts:
//!
//! - [`ReadContext`]: shared access. Everything handed out by the access
//!   API (key handles, documents, nodes, iterators) borrows from it.
//! - [`WriteContext`]: exclusive access used to populate the keyspace.
//!
//! Because readers borrow from the read guard, a writer cannot change a
//! key while any handle into it is alive.
//!
//! # Versioning
//!
//! Every write takes the next value of a keyspace-wide counter and stamps
//! it on the written key. Versions start at 1.

use crate::config::{ConfigError, KeyspaceConfig, CONFIG_FILE_NAME};
use crate::stored_value::{KeyType, StoredData, StoredValue};
use jsonkv_core::{Error, JsonValue, Result};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

type Entries = FxHashMap<String, StoredValue>;

/// In-memory keyspace holding JSON documents and other values
#[derive(Debug, Default)]
pub struct Keyspace {
    config: KeyspaceConfig,
    entries: RwLock<Entries>,
    version: AtomicU64,
}

impl Keyspace {
    /// Create an empty keyspace with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty keyspace with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_config(config: KeyspaceConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Keyspace {
            config,
            entries: RwLock::new(Entries::default()),
            version: AtomicU64::new(0),
        })
    }

    /// Create an empty keyspace configured from `dir/jsonkv.toml`
    ///
    /// Writes the default config file first if there is none.
    pub fn open(dir: &Path) -> std::result::Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        KeyspaceConfig::write_default_if_missing(&path)?;
        let config = KeyspaceConfig::from_file(&path).map_err(|e| {
            warn!(
                target: "jsonkv::storage",
                path = %path.display(),
                error = %e,
                "Rejected keyspace config"
            );
            e
        })?;
        info!(
            target: "jsonkv::storage",
            path = %path.display(),
            legacy_paths = config.legacy_paths,
            "Opened keyspace"
        );
        Self::with_config(config)
    }

    /// Configuration in effect
    pub fn config(&self) -> &KeyspaceConfig {
        &self.config
    }

    /// Version of the most recent write, 0 if none
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the keyspace holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Acquire shared access for a sequence of reads
    pub fn read(&self) -> ReadContext<'_> {
        ReadContext {
            entries: self.entries.read(),
            config: &self.config,
        }
    }

    /// Acquire exclusive access for a sequence of writes
    pub fn write(&self) -> WriteContext<'_> {
        WriteContext {
            entries: self.entries.write(),
            config: &self.config,
            version: &self.version,
        }
    }
}

/// Shared access to a keyspace
///
/// Holds the read lock until dropped.
pub struct ReadContext<'k> {
    entries: RwLockReadGuard<'k, Entries>,
    config: &'k KeyspaceConfig,
}

impl<'k> ReadContext<'k> {
    /// Configuration of the keyspace
    pub fn config(&self) -> &'k KeyspaceConfig {
        self.config
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(key)
    }

    /// Check if `key` exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the keyspace holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw handle to whatever is stored under `key`
    pub fn open_raw(&self, key: &str) -> Option<KeyHandle<'_>> {
        self.entries
            .get_key_value(key)
            .map(|(key, value)| KeyHandle { key, value })
    }
}

impl std::fmt::Debug for ReadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadContext")
            .field("keys", &self.entries.len())
            .finish()
    }
}

/// Untyped handle to a key, borrowed from a [`ReadContext`]
#[derive(Debug, Clone, Copy)]
pub struct KeyHandle<'a> {
    key: &'a str,
    value: &'a StoredValue,
}

impl<'a> KeyHandle<'a> {
    /// Key name
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Kind of value stored under the key
    pub fn key_type(&self) -> KeyType {
        self.value.key_type()
    }

    /// Version of the last write to the key
    pub fn version(&self) -> u64 {
        self.value.version()
    }

    /// The stored value
    pub fn value(&self) -> &'a StoredValue {
        self.value
    }

    /// The JSON document, if the key holds one
    pub fn as_json(&self) -> Option<&'a JsonValue> {
        self.value.as_json()
    }
}

/// Exclusive access to a keyspace
///
/// Holds the write lock until dropped.
pub struct WriteContext<'k> {
    entries: RwLockWriteGuard<'k, Entries>,
    config: &'k KeyspaceConfig,
    version: &'k AtomicU64,
}

/// Advance the keyspace version and return the new value
fn bump_version(version: &AtomicU64) -> u64 {
    version.fetch_add(1, Ordering::AcqRel) + 1
}

fn log_stored(key: &str, kind: KeyType, version: u64) {
    debug!(target: "jsonkv::storage", key, %kind, version, "Stored value");
}

impl WriteContext<'_> {
    fn put(&mut self, key: &str, data: StoredData) -> Result<u64> {
        self.config.limits.validate_key(key)?;
        let version = bump_version(self.version);
        let kind = match data {
            StoredData::Json(_) => KeyType::Json,
            StoredData::String(_) => KeyType::String,
            StoredData::List(_) => KeyType::List,
        };
        self.entries
            .insert(key.to_string(), StoredValue::new(data, version));
        log_stored(key, kind, version);
        Ok(version)
    }

    /// Store a JSON document under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// `Error::Limit` if the key or document exceeds the configured limits.
    pub fn set_json(&mut self, key: &str, doc: impl Into<JsonValue>) -> Result<u64> {
        let doc = doc.into();
        doc.validate(&self.config.limits)?;
        self.put(key, StoredData::Json(doc))
    }

    /// Parse JSON text and store it under `key`
    ///
    /// # Errors
    ///
    /// `Error::Serialization` if the text is not valid JSON, otherwise as
    /// [`set_json`](Self::set_json).
    pub fn set_json_str(&mut self, key: &str, text: &str) -> Result<u64> {
        let doc: JsonValue = text
            .parse()
            .map_err(|e: serde_json::Error| Error::Serialization(e.to_string()))?;
        self.set_json(key, doc)
    }

    /// Store a plain byte string under `key`
    pub fn set_string(&mut self, key: &str, value: impl Into<Vec<u8>>) -> Result<u64> {
        self.put(key, StoredData::String(value.into()))
    }

    /// Append to the list under `key`, creating it if absent
    ///
    /// Returns the new list length.
    ///
    /// # Errors
    ///
    /// `Error::WrongType` if the key holds something other than a list.
    pub fn push_list(&mut self, key: &str, item: impl Into<Vec<u8>>) -> Result<usize> {
        match self.entries.get_mut(key) {
            Some(existing) => {
                let found = existing.key_type();
                let StoredData::List(items) = existing.data_mut() else {
                    return Err(Error::wrong_type(KeyType::List.name(), found.name()));
                };
                items.push_back(item.into());
                let len = items.len();
                let version = bump_version(self.version);
                existing.set_version(version);
                log_stored(key, KeyType::List, version);
                Ok(len)
            }
            None => {
                self.config.limits.validate_key(key)?;
                let version = bump_version(self.version);
                let items = VecDeque::from([item.into()]);
                self.entries.insert(
                    key.to_string(),
                    StoredValue::new(StoredData::List(items), version),
                );
                log_stored(key, KeyType::List, version);
                Ok(1)
            }
        }
    }

    /// Remove `key`, returning whether it existed
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            bump_version(self.version);
            debug!(target: "jsonkv::storage", key, "Deleted key");
        }
        existed
    }

    /// Value currently stored under `key`
    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(key)
    }
}

impl std::fmt::Debug for WriteContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteContext")
            .field("keys", &self.entries.len())
            .finish()
    }
}
