//! Size limits for stored JSON documents, keys and path expressions
//!
//! Limits are enforced when a document is written into the keyspace and when
//! a path expression is parsed. Reads never re-validate: a document that made
//! it into the store is known to be within the limits it was written under.
//!
//! | Limit | Default | Field |
//! |-------|---------|-------|
//! | Max key length | 1 KiB | [`Limits::max_key_bytes`] |
//! | Max document size | 16 MiB | [`Limits::max_document_size`] |
//! | Max nesting depth | 100 levels | [`Limits::max_nesting_depth`] |
//! | Max path length | 256 segments | [`Limits::max_path_length`] |
//! | Max array size | 1M elements | [`Limits::max_array_size`] |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default maximum key length in bytes (1 KiB)
pub const MAX_KEY_BYTES: usize = 1024;

/// Default maximum document size in bytes (16 MiB)
///
/// Measured as the length of the compact JSON text of the document.
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Default maximum nesting depth of a document (100 levels)
///
/// Bounds the recursion of descendant path segments and serialization.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Default maximum number of segments in a path expression
pub const MAX_PATH_LENGTH: usize = 256;

/// Default maximum number of elements in any array of a document
pub const MAX_ARRAY_SIZE: usize = 1_000_000;

/// Configurable limits for documents and paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum key length in bytes
    pub max_key_bytes: usize,
    /// Maximum document size in bytes
    pub max_document_size: usize,
    /// Maximum nesting depth
    pub max_nesting_depth: usize,
    /// Maximum path length in segments
    pub max_path_length: usize,
    /// Maximum array size in elements
    pub max_array_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_bytes: MAX_KEY_BYTES,
            max_document_size: MAX_DOCUMENT_SIZE,
            max_nesting_depth: MAX_NESTING_DEPTH,
            max_path_length: MAX_PATH_LENGTH,
            max_array_size: MAX_ARRAY_SIZE,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_key_bytes: 32,
            max_document_size: 256,
            max_nesting_depth: 4,
            max_path_length: 8,
            max_array_size: 16,
        }
    }

    /// Check that every limit is non-zero
    ///
    /// A zero limit would make the keyspace unable to hold any document.
    pub fn check(&self) -> Result<(), LimitError> {
        let fields = [
            ("max_key_bytes", self.max_key_bytes),
            ("max_document_size", self.max_document_size),
            ("max_nesting_depth", self.max_nesting_depth),
            ("max_path_length", self.max_path_length),
            ("max_array_size", self.max_array_size),
        ];
        match fields.iter().find(|(_, v)| *v == 0) {
            Some((name, _)) => Err(LimitError::ZeroLimit(name)),
            None => Ok(()),
        }
    }

    /// Validate a key length
    pub fn validate_key(&self, key: &str) -> Result<(), LimitError> {
        if key.len() > self.max_key_bytes {
            return Err(LimitError::KeyTooLong {
                actual: key.len(),
                max: self.max_key_bytes,
            });
        }
        Ok(())
    }

    /// Validate the number of segments in a parsed path
    pub fn validate_path_length(&self, length: usize) -> Result<(), LimitError> {
        if length > self.max_path_length {
            return Err(LimitError::PathTooLong {
                length,
                max: self.max_path_length,
            });
        }
        Ok(())
    }

    /// Validate the nesting depth of a path expression
    pub fn validate_expression_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            return Err(LimitError::ExpressionTooDeep {
                depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }

    /// Validate a whole document
    ///
    /// Checks nesting depth and array sizes in one walk, then the encoded
    /// size. Returns the first violation found.
    pub fn validate_document(&self, value: &Value) -> Result<(), LimitError> {
        self.validate_shape(value, 0)?;
        let size = encoded_len(value);
        if size > self.max_document_size {
            return Err(LimitError::DocumentTooLarge {
                size,
                max: self.max_document_size,
            });
        }
        Ok(())
    }

    fn validate_shape(&self, value: &Value, depth: usize) -> Result<(), LimitError> {
        match value {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
            Value::Array(arr) => {
                self.check_depth(depth + 1)?;
                if arr.len() > self.max_array_size {
                    return Err(LimitError::ArrayTooLarge {
                        size: arr.len(),
                        max: self.max_array_size,
                    });
                }
                arr.iter().try_for_each(|v| self.validate_shape(v, depth + 1))
            }
            Value::Object(obj) => {
                self.check_depth(depth + 1)?;
                obj.values().try_for_each(|v| self.validate_shape(v, depth + 1))
            }
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            return Err(LimitError::NestingTooDeep {
                depth,
                max: self.max_nesting_depth,
            });
        }
        Ok(())
    }
}

/// Length of the compact JSON text of `value`, without building it
fn encoded_len(value: &Value) -> usize {
    struct Counter(usize);

    impl std::io::Write for Counter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0 += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let mut counter = Counter(0);
    // Writing a Value into a sink that never fails cannot fail.
    let _ = serde_json::to_writer(&mut counter, value);
    counter.0
}

/// Limit validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Key exceeds maximum length
    #[error("key too long: {actual} bytes exceeds maximum {max}")]
    KeyTooLong {
        /// Actual key length in bytes
        actual: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Document exceeds maximum size
    #[error("document size {size} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual document size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// Document nesting exceeds maximum depth
    #[error("document nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Actual nesting depth
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Path exceeds maximum length
    #[error("path length {length} exceeds maximum of {max} segments")]
    PathTooLong {
        /// Actual path length
        length: usize,
        /// Maximum allowed length
        max: usize,
    },

    /// Path expression nests filters, negations or parentheses too deeply
    #[error("path expression nesting depth {depth} exceeds maximum of {max} levels")]
    ExpressionTooDeep {
        /// Depth reached
        depth: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Array exceeds maximum size
    #[error("array size {size} exceeds maximum of {max} elements")]
    ArrayTooLarge {
        /// Actual array size
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// A configured limit is zero
    #[error("limit '{0}' must be greater than zero")]
    ZeroLimit(&'static str),
}
