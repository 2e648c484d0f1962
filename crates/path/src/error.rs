//! Path parse errors

use jsonkv_core::LimitError;
use thiserror::Error;

/// Error type for JSON path parsing
///
/// Positions are character offsets into the path after legacy
/// normalization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Empty path string with legacy paths disabled
    #[error("empty path")]
    Empty,
    /// Path does not start with `$`
    #[error("path must start with '$'")]
    MissingRoot,
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    /// Input ended where more was expected
    #[error("unexpected end of path at position {0}")]
    UnexpectedEnd(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Unterminated string literal
    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),
    /// Invalid escape sequence in a string literal
    #[error("invalid escape sequence at position {0}")]
    InvalidEscape(usize),
    /// Invalid array index or slice bound
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Invalid number literal in a filter
    #[error("invalid number at position {0}: {1}")]
    InvalidNumber(usize, String),
    /// A comparison operand selects more than one node
    #[error("comparison operand at position {0} must select at most one node")]
    NonSingularQuery(usize),
    /// A literal used where a test is required
    #[error("literal at position {0} must be compared")]
    BareLiteral(usize),
    /// Path exceeds a configured limit
    #[error(transparent)]
    Limit(#[from] LimitError),
}
