//! Path expression parser
//!
//! Recursive descent over the characters of the path. Supported syntax:
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `$` | Root | `$` |
//! | `.key` / `['key']` | Object member | `$.user`, `$['a b']` |
//! | `[n]` | Array element, negative from the end | `$.items[-1]` |
//! | `*` | Every child | `$.items[*]`, `$.*` |
//! | `[s:e:k]` | Array slice | `$.items[1:3]` |
//! | `[a, b]` | Union of selectors | `$['a', 'b']` |
//! | `..` | Descendants | `$..name` |
//! | `[?expr]` | Filter | `$.items[?@.price < 10]` |
//!
//! With legacy paths enabled, paths not starting with `$` are rewritten
//! first: `.` is `$`, `.a` is `$.a`, `a.b` is `$.a.b`, `[0]` is `$[0]`.

use crate::error::PathError;
use crate::query::{CmpOp, FilterExpr, FilterQuery, Operand, Query, Segment, Selector};
use jsonkv_core::{Limits, MAX_NESTING_DEPTH, MAX_PATH_LENGTH};
use serde_json::Value;
use std::borrow::Cow;
use std::str::FromStr;

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Accept paths that do not start with `$`
    pub legacy: bool,
    /// Maximum number of top-level segments
    pub max_segments: usize,
    /// Maximum nesting of filters, negations and parentheses
    pub max_nesting: usize,
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            legacy: true,
            max_segments: MAX_PATH_LENGTH,
            max_nesting: MAX_NESTING_DEPTH,
        }
    }
}

impl PathOptions {
    /// Options taking the segment and nesting limits from `limits`
    pub fn from_limits(limits: &Limits, legacy: bool) -> Self {
        PathOptions {
            legacy,
            max_segments: limits.max_path_length,
            max_nesting: limits.max_nesting_depth,
        }
    }

    fn limits(&self) -> Limits {
        Limits {
            max_path_length: self.max_segments,
            max_nesting_depth: self.max_nesting,
            ..Limits::default()
        }
    }
}

/// Rewrite a legacy path into `$` form
///
/// Paths already starting with `$` are returned unchanged.
pub fn normalize_legacy(path: &str) -> Cow<'_, str> {
    if path.starts_with('$') {
        Cow::Borrowed(path)
    } else if path.is_empty() || path == "." {
        Cow::Borrowed("$")
    } else if path.starts_with('.') || path.starts_with('[') {
        Cow::Owned(format!("${}", path))
    } else {
        Cow::Owned(format!("$.{}", path))
    }
}

impl Query {
    /// Parse with default options
    pub fn parse(path: &str) -> Result<Query, PathError> {
        Query::parse_with(path, &PathOptions::default())
    }

    /// Parse with explicit options
    pub fn parse_with(path: &str, options: &PathOptions) -> Result<Query, PathError> {
        let path = if options.legacy {
            normalize_legacy(path)
        } else if path.is_empty() {
            return Err(PathError::Empty);
        } else {
            Cow::Borrowed(path)
        };

        let limits = options.limits();
        let mut parser = Parser::new(&path, &limits);
        parser.skip_ws();
        if !parser.eat('$') {
            return Err(PathError::MissingRoot);
        }
        let segments = parser.segments()?;
        parser.skip_ws();
        if let Some(c) = parser.peek() {
            return Err(PathError::UnexpectedChar(c, parser.pos));
        }

        limits.validate_path_length(segments.len())?;
        Ok(Query { segments })
    }
}

impl FromStr for Query {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}

struct Parser<'l> {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    limits: &'l Limits,
}

impl<'l> Parser<'l> {
    fn new(s: &str, limits: &'l Limits) -> Self {
        Parser {
            chars: s.chars().collect(),
            pos: 0,
            depth: 0,
            limits,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        let n = s.chars().count();
        if self.chars.len() >= self.pos + n
            && self.chars[self.pos..self.pos + n].iter().copied().eq(s.chars())
        {
            self.pos += n;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), PathError> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(PathError::UnexpectedChar(found, self.pos)),
            None => Err(PathError::UnexpectedEnd(self.pos)),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    /// Segments until something that cannot start a segment
    fn segments(&mut self) -> Result<Vec<Segment>, PathError> {
        let mut segments = Vec::new();
        loop {
            let save = self.pos;
            self.skip_ws();
            match self.peek() {
                Some('.') if self.peek_at(1) == Some('.') => {
                    self.pos += 2;
                    segments.push(Segment::Descendant(self.descendant_selectors()?));
                }
                Some('.') => {
                    self.pos += 1;
                    segments.push(Segment::Child(vec![self.dot_selector()?]));
                }
                Some('[') => {
                    segments.push(Segment::Child(self.bracket()?));
                }
                _ => {
                    self.pos = save;
                    return Ok(segments);
                }
            }
        }
    }

    fn descendant_selectors(&mut self) -> Result<Vec<Selector>, PathError> {
        match self.peek() {
            Some('[') => self.bracket(),
            Some(_) => Ok(vec![self.dot_selector()?]),
            None => Err(PathError::UnexpectedEnd(self.pos)),
        }
    }

    /// `*` or a member name after `.` or `..`
    fn dot_selector(&mut self) -> Result<Selector, PathError> {
        if self.eat('*') {
            return Ok(Selector::Wildcard);
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return match self.peek() {
                Some(c) => Err(PathError::UnexpectedChar(c, self.pos)),
                None => Err(PathError::UnexpectedEnd(self.pos)),
            };
        }
        Ok(Selector::Name(self.chars[start..self.pos].iter().collect()))
    }

    /// `[selector, selector, ...]`
    fn bracket(&mut self) -> Result<Vec<Selector>, PathError> {
        let open = self.pos;
        self.expect('[')?;
        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            if self.peek().is_none() {
                return Err(PathError::UnclosedBracket(open));
            }
            selectors.push(self.selector()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(selectors);
                }
                Some(c) => return Err(PathError::UnexpectedChar(c, self.pos)),
                None => return Err(PathError::UnclosedBracket(open)),
            }
        }
    }

    fn selector(&mut self) -> Result<Selector, PathError> {
        match self.peek() {
            Some('\'' | '"') => Ok(Selector::Name(self.string()?)),
            Some('*') => {
                self.pos += 1;
                Ok(Selector::Wildcard)
            }
            Some('?') => {
                self.pos += 1;
                self.skip_ws();
                Ok(Selector::Filter(Box::new(self.logical_or()?)))
            }
            _ => self.index_or_slice(),
        }
    }

    fn index_or_slice(&mut self) -> Result<Selector, PathError> {
        let start = self.opt_int()?;
        self.skip_ws();
        if !self.eat(':') {
            return match start {
                Some(i) => Ok(Selector::Index(i)),
                None => match self.peek() {
                    Some(c) => Err(PathError::UnexpectedChar(c, self.pos)),
                    None => Err(PathError::UnexpectedEnd(self.pos)),
                },
            };
        }
        self.skip_ws();
        let end = self.opt_int()?;
        self.skip_ws();
        let step = if self.eat(':') {
            self.skip_ws();
            self.opt_int()?
        } else {
            None
        };
        Ok(Selector::Slice { start, end, step })
    }

    fn opt_int(&mut self) -> Result<Option<i64>, PathError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some('0'..='9')) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse::<i64>()
            .map(Some)
            .map_err(|_| PathError::InvalidIndex(start, text))
    }

    /// Quoted string with JSON-style escapes, either quote character
    fn string(&mut self) -> Result<String, PathError> {
        let open = self.pos;
        let quote = self.chars[self.pos];
        self.pos += 1;
        let mut out = String::new();
        loop {
            let c = self.peek().ok_or(PathError::UnterminatedString(open))?;
            self.pos += 1;
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let esc_pos = self.pos - 1;
            let e = self.peek().ok_or(PathError::UnterminatedString(open))?;
            self.pos += 1;
            match e {
                '\\' | '/' | '\'' | '"' => out.push(e),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'u' => out.push(self.unicode_escape(esc_pos)?),
                _ => return Err(PathError::InvalidEscape(esc_pos)),
            }
        }
    }

    fn hex4(&mut self, esc_pos: usize) -> Result<u32, PathError> {
        if self.pos + 4 > self.chars.len() {
            return Err(PathError::InvalidEscape(esc_pos));
        }
        let hex: String = self.chars[self.pos..self.pos + 4].iter().collect();
        self.pos += 4;
        u32::from_str_radix(&hex, 16).map_err(|_| PathError::InvalidEscape(esc_pos))
    }

    fn unicode_escape(&mut self, esc_pos: usize) -> Result<char, PathError> {
        let hi = self.hex4(esc_pos)?;
        let code = if (0xD800..0xDC00).contains(&hi) {
            if !self.eat_str("\\u") {
                return Err(PathError::InvalidEscape(esc_pos));
            }
            let lo = self.hex4(esc_pos)?;
            if !(0xDC00..0xE000).contains(&lo) {
                return Err(PathError::InvalidEscape(esc_pos));
            }
            0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
        } else {
            hi
        };
        char::from_u32(code).ok_or(PathError::InvalidEscape(esc_pos))
    }

    // ---------------------------------------------------------------------
    // Filter expressions
    // ---------------------------------------------------------------------

    fn logical_or(&mut self) -> Result<FilterExpr, PathError> {
        let mut left = self.logical_and()?;
        loop {
            self.skip_ws();
            if !self.eat_str("||") {
                return Ok(left);
            }
            self.skip_ws();
            let right = self.logical_and()?;
            left = FilterExpr::Or(Box::new(left), Box::new(right));
        }
    }

    fn logical_and(&mut self) -> Result<FilterExpr, PathError> {
        let mut left = self.basic()?;
        loop {
            self.skip_ws();
            if !self.eat_str("&&") {
                return Ok(left);
            }
            self.skip_ws();
            let right = self.basic()?;
            left = FilterExpr::And(Box::new(left), Box::new(right));
        }
    }

    /// Every nested expression passes through here, so the depth counter
    /// bounds the recursion of the whole filter grammar.
    fn basic(&mut self) -> Result<FilterExpr, PathError> {
        self.depth += 1;
        let result = self
            .limits
            .validate_expression_depth(self.depth)
            .map_err(PathError::from)
            .and_then(|()| self.basic_inner());
        self.depth -= 1;
        result
    }

    fn basic_inner(&mut self) -> Result<FilterExpr, PathError> {
        self.skip_ws();
        if self.peek() == Some('!') && self.peek_at(1) != Some('=') {
            self.pos += 1;
            return Ok(FilterExpr::Not(Box::new(self.basic()?)));
        }
        if self.eat('(') {
            self.skip_ws();
            let inner = self.logical_or()?;
            self.skip_ws();
            self.expect(')')?;
            return Ok(inner);
        }

        let start = self.pos;
        let left = self.operand()?;
        self.skip_ws();
        match self.cmp_op() {
            Some(op) => {
                self.skip_ws();
                let right_start = self.pos;
                let right = self.operand()?;
                check_singular(&left, start)?;
                check_singular(&right, right_start)?;
                Ok(FilterExpr::Compare { left, op, right })
            }
            None => match left {
                Operand::Query(q) => Ok(FilterExpr::Exists(q)),
                Operand::Literal(_) => Err(PathError::BareLiteral(start)),
            },
        }
    }

    fn cmp_op(&mut self) -> Option<CmpOp> {
        const OPS: [(&str, CmpOp); 6] = [
            ("==", CmpOp::Eq),
            ("!=", CmpOp::Ne),
            ("<=", CmpOp::Le),
            (">=", CmpOp::Ge),
            ("<", CmpOp::Lt),
            (">", CmpOp::Gt),
        ];
        OPS.iter()
            .find(|(text, _)| self.eat_str(text))
            .map(|(_, op)| *op)
    }

    fn operand(&mut self) -> Result<Operand, PathError> {
        match self.peek() {
            Some('@') => {
                self.pos += 1;
                Ok(Operand::Query(FilterQuery {
                    relative: true,
                    segments: self.segments()?,
                }))
            }
            Some('$') => {
                self.pos += 1;
                Ok(Operand::Query(FilterQuery {
                    relative: false,
                    segments: self.segments()?,
                }))
            }
            Some('\'' | '"') => Ok(Operand::Literal(Value::String(self.string()?))),
            Some('-' | '0'..='9') => Ok(Operand::Literal(self.number()?)),
            Some(_) => {
                for (word, value) in [
                    ("true", Value::Bool(true)),
                    ("false", Value::Bool(false)),
                    ("null", Value::Null),
                ] {
                    if self.eat_str(word) {
                        return Ok(Operand::Literal(value));
                    }
                }
                Err(PathError::UnexpectedChar(self.chars[self.pos], self.pos))
            }
            None => Err(PathError::UnexpectedEnd(self.pos)),
        }
    }

    fn number(&mut self) -> Result<Value, PathError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some('-' | '+' | '.' | 'e' | 'E' | '0'..='9')
        ) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match serde_json::from_str::<Value>(&text) {
            Ok(v @ Value::Number(_)) => Ok(v),
            _ => Err(PathError::InvalidNumber(start, text)),
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '$' || (!c.is_ascii() && !c.is_whitespace())
}

fn check_singular(operand: &Operand, pos: usize) -> Result<(), PathError> {
    match operand {
        Operand::Query(q) if !q.segments.iter().all(Segment::is_singular) => {
            Err(PathError::NonSingularQuery(pos))
        }
        _ => Ok(()),
    }
}
