//! Borrowed, read-only views into a stored document
//!
//! A [`Node`] is a `Copy` handle on one value inside a document owned by the
//! keyspace. It never owns or copies the tree, and its lifetime ties it to
//! the borrow it was produced from, so it cannot outlive the document.
//!
//! Every typed accessor follows the same contract: check the discriminant,
//! then extract. On a mismatch the accessor returns an error and produces
//! nothing.

use crate::error::{Error, Result};
use crate::json::{JsonType, JsonValue};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::io;

/// Payload of a node, one variant per [`JsonType`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind<'a> {
    /// String payload, borrowed
    String(&'a str),
    /// Integer payload
    Int(i64),
    /// Floating point payload
    Double(f64),
    /// Boolean payload
    Bool(bool),
    /// Object members in storage order
    Object(&'a Map<String, Value>),
    /// Array elements
    Array(&'a [Value]),
    /// No payload
    Null,
}

impl NodeKind<'_> {
    /// Discriminant of this payload
    pub fn json_type(&self) -> JsonType {
        match self {
            NodeKind::String(_) => JsonType::String,
            NodeKind::Int(_) => JsonType::Int,
            NodeKind::Double(_) => JsonType::Double,
            NodeKind::Bool(_) => JsonType::Bool,
            NodeKind::Object(_) => JsonType::Object,
            NodeKind::Array(_) => JsonType::Array,
            NodeKind::Null => JsonType::Null,
        }
    }
}

/// Read-only view of one JSON value
#[derive(Clone, Copy, PartialEq)]
pub struct Node<'a> {
    value: &'a Value,
}

impl<'a> Node<'a> {
    /// Wrap a borrowed value
    pub fn new(value: &'a Value) -> Self {
        Node { value }
    }

    /// The borrowed value
    pub fn as_value(&self) -> &'a Value {
        self.value
    }

    /// Discriminant of this node; never fails
    pub fn get_type(&self) -> JsonType {
        JsonType::of(self.value)
    }

    /// Payload of this node as a sum type
    pub fn kind(&self) -> NodeKind<'a> {
        match self.value {
            Value::Null => NodeKind::Null,
            Value::Bool(b) => NodeKind::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => NodeKind::Int(i),
                // as_f64 is total for numbers without arbitrary_precision
                None => NodeKind::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => NodeKind::String(s),
            Value::Array(arr) => NodeKind::Array(arr),
            Value::Object(obj) => NodeKind::Object(obj),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::wrong_type(expected, self.get_type().name())
    }

    /// Element count of an Object or Array
    pub fn get_len(&self) -> Result<usize> {
        match self.kind() {
            NodeKind::Object(obj) => Ok(obj.len()),
            NodeKind::Array(arr) => Ok(arr.len()),
            _ => Err(self.mismatch("object or array")),
        }
    }

    /// Integer value of an Int node
    pub fn get_int(&self) -> Result<i64> {
        match self.kind() {
            NodeKind::Int(i) => Ok(i),
            _ => Err(self.mismatch(JsonType::Int.name())),
        }
    }

    /// Floating point value of a Double node
    ///
    /// Int nodes are rejected; no numeric coercion happens here.
    pub fn get_double(&self) -> Result<f64> {
        match self.kind() {
            NodeKind::Double(d) => Ok(d),
            _ => Err(self.mismatch(JsonType::Double.name())),
        }
    }

    /// Flag of a Bool node
    pub fn get_boolean(&self) -> Result<bool> {
        match self.kind() {
            NodeKind::Bool(b) => Ok(b),
            _ => Err(self.mismatch(JsonType::Bool.name())),
        }
    }

    /// Borrowed string of a String node
    ///
    /// Zero-copy: the returned slice points into the stored document and its
    /// `len()` is the authoritative byte length.
    pub fn get_string(&self) -> Result<&'a str> {
        match self.kind() {
            NodeKind::String(s) => Ok(s),
            _ => Err(self.mismatch(JsonType::String.name())),
        }
    }

    /// Byte length of a String node
    pub fn str_len(&self) -> Result<usize> {
        self.get_string().map(str::len)
    }

    /// Child at `index`: an Array element, or an Object member value in
    /// storage order
    ///
    /// # Errors
    ///
    /// - `WrongType` if this node is not an Array or Object
    /// - `OutOfRange` if `index >= len`
    pub fn get_at(&self, index: usize) -> Result<Node<'a>> {
        let (child, len) = match self.kind() {
            NodeKind::Array(arr) => (arr.get(index), arr.len()),
            NodeKind::Object(obj) => (obj.values().nth(index), obj.len()),
            _ => return Err(self.mismatch("object or array")),
        };
        child
            .map(Node::new)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Member value of an Object node by key
    pub fn get_key(&self, key: &str) -> Result<Option<Node<'a>>> {
        match self.kind() {
            NodeKind::Object(obj) => Ok(obj.get(key).map(Node::new)),
            _ => Err(self.mismatch(JsonType::Object.name())),
        }
    }

    /// Member keys of an Object node in storage order
    pub fn keys(&self) -> Result<impl Iterator<Item = &'a str> + 'a> {
        match self.kind() {
            NodeKind::Object(obj) => Ok(obj.keys().map(String::as_str)),
            _ => Err(self.mismatch(JsonType::Object.name())),
        }
    }

    /// Members of an Object node in storage order
    pub fn members(&self) -> Result<impl Iterator<Item = (&'a str, Node<'a>)> + 'a> {
        match self.kind() {
            NodeKind::Object(obj) => Ok(obj.iter().map(|(k, v)| (k.as_str(), Node::new(v)))),
            _ => Err(self.mismatch(JsonType::Object.name())),
        }
    }

    /// Elements of an Array node
    pub fn elements(&self) -> Result<impl Iterator<Item = Node<'a>> + 'a> {
        match self.kind() {
            NodeKind::Array(arr) => Ok(arr.iter().map(Node::new)),
            _ => Err(self.mismatch(JsonType::Array.name())),
        }
    }

    /// Compact JSON text of this node, owned by the caller
    ///
    /// Valid on every type, including Null (`null`) and containers.
    ///
    /// # Errors
    ///
    /// `AllocationFailure` if the output buffer cannot grow.
    pub fn get_json(&self) -> Result<String> {
        let mut out = FallibleBuf::with_hint(size_hint(self.value))?;
        serde_json::to_writer(&mut out, self.value).map_err(|e| out.classify(e))?;
        out.into_string()
    }

    /// JSON text of this node using caller-chosen whitespace
    pub fn get_json_formatted(&self, format: &JsonFormat) -> Result<String> {
        let mut out = FallibleBuf::with_hint(size_hint(self.value))?;
        let mut ser = serde_json::Serializer::with_formatter(&mut out, format.formatter());
        self.value.serialize(&mut ser).map_err(|e| out.classify(e))?;
        out.into_string()
    }

    /// Deep copy of this node as an owned document
    pub fn to_owned_value(&self) -> JsonValue {
        JsonValue::from(self.value.clone())
    }

    /// Deep equality by discriminant: an Int never equals a Double, even
    /// when both hold the same number
    pub fn strict_eq(&self, other: &Node<'_>) -> bool {
        match (self.kind(), other.kind()) {
            (NodeKind::Array(a), NodeKind::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| Node::new(x).strict_eq(&Node::new(y)))
            }
            (NodeKind::Object(a), NodeKind::Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.get(k)
                            .map_or(false, |w| Node::new(v).strict_eq(&Node::new(w)))
                    })
            }
            (a, b) => a == b,
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(self.value).finish()
    }
}

impl<'a> From<&'a JsonValue> for Node<'a> {
    fn from(v: &'a JsonValue) -> Self {
        Node::new(v.as_inner())
    }
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(v: &'a Value) -> Self {
        Node::new(v)
    }
}

/// Initial buffer reservation for the JSON text of `value`
fn size_hint(value: &Value) -> usize {
    match value {
        Value::Null => 4,
        Value::Bool(_) => 5,
        Value::Number(_) => 24,
        Value::String(s) => s.len() + 2,
        Value::Array(arr) => 2 + arr.len() * 8,
        Value::Object(obj) => 2 + obj.len() * 16,
    }
}

/// Output buffer whose growth failures surface as errors instead of aborts
struct FallibleBuf {
    buf: Vec<u8>,
    failed: Option<usize>,
}

impl FallibleBuf {
    fn with_hint(hint: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve(hint)
            .map_err(|_| Error::AllocationFailure { requested: hint })?;
        Ok(FallibleBuf { buf, failed: None })
    }

    fn classify(&self, err: serde_json::Error) -> Error {
        match self.failed {
            Some(requested) => Error::AllocationFailure { requested },
            None => Error::Serialization(err.to_string()),
        }
    }

    fn into_string(self) -> Result<String> {
        String::from_utf8(self.buf).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl io::Write for FallibleBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.buf.try_reserve(data.len()).is_err() {
            self.failed = Some(data.len());
            return Err(io::ErrorKind::OutOfMemory.into());
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Whitespace used by [`Node::get_json_formatted`]
///
/// All fields empty (the default) gives compact output. `indent` is
/// repeated once per nesting level after each `newline`; `space` follows
/// the `:` between an object key and its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonFormat {
    /// Indentation unit, e.g. `"  "`
    pub indent: String,
    /// Line separator, e.g. `"\n"`
    pub newline: String,
    /// Separator after `:`, e.g. `" "`
    pub space: String,
}

impl JsonFormat {
    /// Two-space indented, newline separated output
    pub fn pretty() -> Self {
        JsonFormat {
            indent: "  ".to_string(),
            newline: "\n".to_string(),
            space: " ".to_string(),
        }
    }

    fn formatter(&self) -> WhitespaceFormatter<'_> {
        WhitespaceFormatter {
            format: self,
            depth: 0,
            has_value: false,
        }
    }
}

struct WhitespaceFormatter<'f> {
    format: &'f JsonFormat,
    depth: usize,
    has_value: bool,
}

impl WhitespaceFormatter<'_> {
    fn newline_indent<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.format.newline.as_bytes())?;
        for _ in 0..self.depth {
            writer.write_all(self.format.indent.as_bytes())?;
        }
        Ok(())
    }

    fn open<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.depth -= 1;
        if self.has_value {
            self.newline_indent(writer)?;
        }
        writer.write_all(bracket)
    }

    fn item<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if !first {
            writer.write_all(b",")?;
        }
        self.newline_indent(writer)
    }
}

impl serde_json::ser::Formatter for WhitespaceFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.item(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.item(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")?;
        writer.write_all(self.format.space.as_bytes())
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}
