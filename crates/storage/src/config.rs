//! Keyspace configuration via `jsonkv.toml`
//!
//! On first open, a default `jsonkv.toml` is created in the data directory.
//! To change settings, edit the file and reopen the keyspace.

use jsonkv_core::{LimitError, Limits};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name placed in the keyspace data directory.
pub const CONFIG_FILE_NAME: &str = "jsonkv.toml";

/// Errors raised while loading or writing a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config file '{}': {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this config
    #[error("failed to parse config file '{}': {message}", path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// The config could not be serialized
    #[error("failed to serialize config: {0}")]
    Serialize(String),
    /// A value is out of its accepted range
    #[error("invalid config: {0}")]
    Invalid(#[from] LimitError),
}

/// Keyspace configuration loaded from `jsonkv.toml`.
///
/// # Example
///
/// ```toml
/// legacy_paths = true
///
/// [limits]
/// max_document_size = 16777216
/// max_nesting_depth = 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyspaceConfig {
    /// Accept paths without a leading `$` (`.a.b`, `a.b`, `[0]`).
    #[serde(default = "default_legacy_paths")]
    pub legacy_paths: bool,
    /// Document, key and path limits.
    #[serde(default)]
    pub limits: Limits,
}

fn default_legacy_paths() -> bool {
    true
}

impl Default for KeyspaceConfig {
    fn default() -> Self {
        Self {
            legacy_paths: default_legacy_paths(),
            limits: Limits::default(),
        }
    }
}

impl KeyspaceConfig {
    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.check()?;
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# jsonkv keyspace configuration
#
# Accept paths without a leading '$' such as ".a.b", "a.b" or "[0]"
# (default: true). Paths starting with '$' are never rewritten.
legacy_paths = true

[limits]
# Longest key name, in bytes
max_key_bytes = 1024
# Largest document, in bytes of compact JSON (default: 16 MiB)
max_document_size = 16777216
# Deepest container nesting
max_nesting_depth = 100
# Most segments in one path expression
max_path_length = 256
# Most elements in one array
max_array_size = 1000000
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: KeyspaceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
