//! Result iterator over path query matches
//!
//! A `ResultsIterator` is a single-pass, forward-only cursor. Its total
//! count is fixed when the query runs; [`len`](ResultsIterator::len) keeps
//! reporting it while the cursor advances. Once exhausted it yields `None`
//! forever, and it cannot be rewound.

use jsonkv_core::Node;
use serde_json::Value;
use std::iter::FusedIterator;
use tracing::trace;

/// Cursor over the nodes matched by one query
#[derive(Debug)]
pub struct ResultsIterator<'a> {
    results: Vec<Node<'a>>,
    pos: usize,
}

impl<'a> ResultsIterator<'a> {
    pub(crate) fn new(results: Vec<&'a Value>) -> Self {
        ResultsIterator {
            results: results.into_iter().map(Node::new).collect(),
            pos: 0,
        }
    }

    /// Total number of matches, independent of progress
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the query matched nothing
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Matches not yet returned by `next`
    pub fn remaining(&self) -> usize {
        self.results.len() - self.pos
    }

    /// Number of matches already returned
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Release the iterator
    ///
    /// Consumes the iterator, so it cannot be used afterwards:
    ///
    /// ```compile_fail
    /// use jsonkv_api::Document;
    /// use serde_json::json;
    ///
    /// let value = json!([1, 2]);
    /// let doc = Document::from_value(&value);
    /// let iter = doc.query("$[*]").unwrap();
    /// iter.free();
    /// let _ = iter.len();
    /// ```
    ///
    /// Dropping the iterator releases it as well; `free` only makes the
    /// release point explicit.
    pub fn free(self) {
        drop(self);
    }
}

impl<'a> Iterator for ResultsIterator<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        let node = self.results.get(self.pos).copied()?;
        self.pos += 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl FusedIterator for ResultsIterator<'_> {}

impl Drop for ResultsIterator<'_> {
    fn drop(&mut self) {
        trace!(
            target: "jsonkv::api",
            len = self.results.len(),
            consumed = self.pos,
            "Released results iterator"
        );
    }
}
