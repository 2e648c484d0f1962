//! Error types for the JSON access API
//!
//! Every validating operation fails locally with one of these variants.
//! None of them is transient: a type mismatch or a missing path fails the
//! same way on every call with the same inputs, so nothing in the API
//! retries. Iterator exhaustion is not an error and has no variant here.

use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for jsonkv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy of the JSON access API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested key or path does not resolve to any value
    #[error("not found: {what}")]
    NotFound {
        /// What was looked up (a key name or a path)
        what: String,
    },

    /// The operation requires a different type than the one found
    ///
    /// Also raised when a JSON-only operation is applied to a key holding
    /// another kind of value.
    #[error("wrong type: expected {expected}, found {found}")]
    WrongType {
        /// Type name the operation needs
        expected: &'static str,
        /// Type name actually found
        found: &'static str,
    },

    /// Positional index past the end of the addressed collection
    #[error("index out of range: {index} >= {len}")]
    OutOfRange {
        /// The requested index
        index: usize,
        /// The collection length
        len: usize,
    },

    /// Resource exhaustion while producing an owned result
    #[error("allocation of {requested} bytes failed")]
    AllocationFailure {
        /// Bytes requested when the allocation failed
        requested: usize,
    },

    /// The path resolver rejected a path expression
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The path as given by the caller
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// JSON text production failed for a reason other than allocation
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A document or key violates the configured limits
    #[error(transparent)]
    Limit(#[from] LimitError),
}

impl Error {
    /// Shorthand for a `NotFound` error
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound { what: what.into() }
    }

    /// Shorthand for a `WrongType` error
    pub fn wrong_type(expected: &'static str, found: &'static str) -> Self {
        Error::WrongType { expected, found }
    }

    /// Check whether this is a `NotFound` error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check whether this is a `WrongType` error
    pub fn is_wrong_type(&self) -> bool {
        matches!(self, Error::WrongType { .. })
    }

    /// Check whether this is an `OutOfRange` error
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}
