//! JSON value types
//!
//! This module defines the stored side of the value model:
//! - JsonType: the seven-way discriminant every node carries
//! - JsonValue: Newtype wrapper around serde_json::Value, the unit the
//!   keyspace stores under a key
//!
//! Objects keep their members in insertion order (`serde_json` is built
//! with `preserve_order`), which is the storage order observed by indexed
//! access and by wildcard or descendant path segments.

use crate::limits::{LimitError, Limits};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// One past the last valid [`JsonType`] discriminant
///
/// Consumers iterating over raw discriminants stop here.
pub const JSON_TYPE_EOF: i32 = 7;

/// Discriminant of a JSON node
///
/// The numeric values are stable and shared by every revision of the
/// access API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum JsonType {
    /// A string
    String = 0,
    /// A number representable as a 64-bit signed integer
    Int = 1,
    /// Any other number
    Double = 2,
    /// `true` or `false`
    Bool = 3,
    /// An object
    Object = 4,
    /// An array
    Array = 5,
    /// `null`
    Null = 6,
}

impl JsonType {
    /// All discriminants in numeric order
    pub const ALL: [JsonType; 7] = [
        JsonType::String,
        JsonType::Int,
        JsonType::Double,
        JsonType::Bool,
        JsonType::Object,
        JsonType::Array,
        JsonType::Null,
    ];

    /// Classify a `serde_json::Value`
    ///
    /// A number is `Int` when it fits in an `i64`, `Double` otherwise
    /// (fractions, exponents, and integers above `i64::MAX`).
    pub fn of(value: &serde_json::Value) -> JsonType {
        match value {
            serde_json::Value::Null => JsonType::Null,
            serde_json::Value::Bool(_) => JsonType::Bool,
            serde_json::Value::Number(n) if n.is_i64() => JsonType::Int,
            serde_json::Value::Number(_) => JsonType::Double,
            serde_json::Value::String(_) => JsonType::String,
            serde_json::Value::Array(_) => JsonType::Array,
            serde_json::Value::Object(_) => JsonType::Object,
        }
    }

    /// Raw discriminant
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Decode a raw discriminant, `None` at or past [`JSON_TYPE_EOF`]
    pub fn from_i32(raw: i32) -> Option<JsonType> {
        if (0..JSON_TYPE_EOF).contains(&raw) {
            Some(JsonType::ALL[raw as usize])
        } else {
            None
        }
    }

    /// Type name as reported by the type command
    pub fn name(self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Int => "integer",
            JsonType::Double => "number",
            JsonType::Bool => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Null => "null",
        }
    }

    /// Check whether this is a container type
    pub fn is_container(self) -> bool {
        matches!(self, JsonType::Object | JsonType::Array)
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// JSON document stored under a keyspace key
///
/// Newtype around serde_json::Value providing read access via Deref,
/// construction from common types, and limit validation.
///
/// # Examples
///
/// ```
/// use jsonkv_core::{JsonType, JsonValue};
///
/// let doc: JsonValue = r#"{"a": [1, 2.5]}"#.parse().unwrap();
/// assert_eq!(doc.json_type(), JsonType::Object);
/// assert_eq!(JsonValue::from(7i64).json_type(), JsonType::Int);
/// assert_eq!(JsonValue::from(2.5).json_type(), JsonType::Double);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct JsonValue(serde_json::Value);

impl JsonValue {
    /// Create a null JSON value
    pub fn null() -> Self {
        JsonValue(serde_json::Value::Null)
    }

    /// Create an empty JSON object
    pub fn object() -> Self {
        JsonValue(serde_json::Value::Object(serde_json::Map::new()))
    }

    /// Create an empty JSON array
    pub fn array() -> Self {
        JsonValue(serde_json::Value::Array(Vec::new()))
    }

    /// Get the underlying serde_json::Value
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the underlying serde_json::Value
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }

    /// Discriminant of the root value
    pub fn json_type(&self) -> JsonType {
        JsonType::of(&self.0)
    }

    /// Serialize to compact JSON string
    pub fn to_json_string(&self) -> String {
        self.0.to_string()
    }

    /// Validate against the given limits
    pub fn validate(&self, limits: &Limits) -> Result<(), LimitError> {
        limits.validate_document(&self.0)
    }
}

impl FromStr for JsonValue {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(JsonValue)
    }
}

// Read-only: documents are never mutated through the access API.
impl Deref for JsonValue {
    type Target = serde_json::Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(v: serde_json::Value) -> Self {
        JsonValue(v)
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(v: JsonValue) -> Self {
        v.0
    }
}

impl From<bool> for JsonValue {
    fn from(v: bool) -> Self {
        JsonValue(serde_json::Value::Bool(v))
    }
}

impl From<i64> for JsonValue {
    fn from(v: i64) -> Self {
        JsonValue(serde_json::Value::Number(v.into()))
    }
}

impl From<f64> for JsonValue {
    /// NaN and infinities have no JSON form and become null
    fn from(v: f64) -> Self {
        JsonValue(
            serde_json::Number::from_f64(v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        )
    }
}

impl From<&str> for JsonValue {
    fn from(v: &str) -> Self {
        JsonValue(serde_json::Value::String(v.to_string()))
    }
}

impl From<String> for JsonValue {
    fn from(v: String) -> Self {
        JsonValue(serde_json::Value::String(v))
    }
}
