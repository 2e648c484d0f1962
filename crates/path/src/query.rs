//! Parsed path expressions
//!
//! A [`Query`] is a sequence of segments applied left to right, each mapping
//! the current node list to a new one. Display renders the canonical form
//! (`$["a"][0]`), used in logs.

use serde_json::Value;
use std::fmt;

/// A parsed path expression rooted at `$`
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub(crate) segments: Vec<Segment>,
}

impl Query {
    /// The root query `$`
    pub fn root() -> Self {
        Query {
            segments: Vec::new(),
        }
    }

    /// Segments in application order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root query
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this query can select at most one node
    ///
    /// True when every segment is a child segment with a single name or
    /// index selector.
    pub fn is_singular(&self) -> bool {
        self.segments.iter().all(Segment::is_singular)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        write_segments(f, &self.segments)
    }
}

fn write_segments(f: &mut fmt::Formatter<'_>, segments: &[Segment]) -> fmt::Result {
    segments.iter().try_for_each(|s| write!(f, "{}", s))
}

/// One step of a query
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Apply the selectors to each input node: `.a`, `[0, 'b']`
    Child(Vec<Selector>),
    /// Apply the selectors to each input node and all of its descendants:
    /// `..a`, `..[*]`
    Descendant(Vec<Selector>),
}

impl Segment {
    /// Selectors of this segment
    pub fn selectors(&self) -> &[Selector] {
        match self {
            Segment::Child(s) | Segment::Descendant(s) => s,
        }
    }

    pub(crate) fn is_singular(&self) -> bool {
        match self {
            Segment::Child(s) => {
                s.len() == 1 && matches!(s[0], Selector::Name(_) | Selector::Index(_))
            }
            Segment::Descendant(_) => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, selectors) = match self {
            Segment::Child(s) => ("", s),
            Segment::Descendant(s) => ("..", s),
        };
        write!(f, "{}[", prefix)?;
        for (i, s) in selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "]")
    }
}

/// Node selector inside a segment
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Object member by name
    Name(String),
    /// Array element by index, negative counts from the end
    Index(i64),
    /// Every child of an array or object
    Wildcard,
    /// Array slice `start:end:step`
    Slice {
        /// First index (inclusive)
        start: Option<i64>,
        /// Last index (exclusive)
        end: Option<i64>,
        /// Stride, default 1
        step: Option<i64>,
    },
    /// Children for which the expression holds
    Filter(Box<FilterExpr>),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "{}", Value::String(name.clone())),
            Selector::Index(i) => write!(f, "{}", i),
            Selector::Wildcard => write!(f, "*"),
            Selector::Slice { start, end, step } => {
                if let Some(s) = start {
                    write!(f, "{}", s)?;
                }
                write!(f, ":")?;
                if let Some(e) = end {
                    write!(f, "{}", e)?;
                }
                if let Some(st) = step {
                    write!(f, ":{}", st)?;
                }
                Ok(())
            }
            Selector::Filter(expr) => write!(f, "?{}", expr),
        }
    }
}

/// Boolean expression of a filter selector
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `a || b`
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// `a && b`
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// `!a`
    Not(Box<FilterExpr>),
    /// `left op right`
    Compare {
        /// Left operand
        left: Operand,
        /// Operator
        op: CmpOp,
        /// Right operand
        right: Operand,
    },
    /// True when the query selects at least one node
    Exists(FilterQuery),
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Or(a, b) => write!(f, "({} || {})", a, b),
            FilterExpr::And(a, b) => write!(f, "({} && {})", a, b),
            FilterExpr::Not(a) => write!(f, "!{}", a),
            FilterExpr::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            FilterExpr::Exists(q) => write!(f, "{}", q),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        })
    }
}

/// Comparison operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A JSON literal
    Literal(Value),
    /// A singular query, absent when it selects nothing
    Query(FilterQuery),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(v) => write!(f, "{}", v),
            Operand::Query(q) => write!(f, "{}", q),
        }
    }
}

/// Query embedded in a filter, relative to `@` or to `$`
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    /// True for `@`, false for `$`
    pub relative: bool,
    /// Segments applied from the start node
    pub segments: Vec<Segment>,
}

impl fmt::Display for FilterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", if self.relative { "@" } else { "$" })?;
        write_segments(f, &self.segments)
    }
}
