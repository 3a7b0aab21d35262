//! Search — literal byte-substring search over the document.
//!
//! Searches are literal matches on row content — simple, fast, and exactly
//! what a minimal editor needs. Forward and backward searches both wrap
//! around the document, so "find next" from anywhere always lands on a
//! match if one exists.
//!
//! The session layer drives this from an incremental prompt: each input
//! change re-searches from the pre-find cursor, and arrow keys step
//! through matches with [`find`] in either direction.

use crate::document::Document;
use crate::row::Row;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A search match: the row and content-byte column where it starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchPos {
    pub cy: usize,
    pub cx: usize,
}

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// Find the next match of `query` searching forward from `(cy, cx)`.
///
/// The position itself is included — to skip a match already under the
/// cursor, pass `cx + 1`. Wraps around the end of the document.
#[must_use]
pub fn find_forward(doc: &Document, query: &[u8], from: MatchPos) -> Option<MatchPos> {
    if query.is_empty() || doc.row_count() == 0 {
        return None;
    }

    let count = doc.row_count();
    for offset in 0..count {
        let cy = (from.cy + offset) % count;
        let start = if offset == 0 { from.cx } else { 0 };

        if let Some(cx) = search_row_forward(doc.row(cy)?, query, start) {
            return Some(MatchPos { cy, cx });
        }
    }

    // Wrap tail: the starting row was only searched from `from.cx`; check
    // its head for matches before that point.
    if from.cx > 0 {
        let cy = from.cy % count;
        if let Some(cx) = search_row_forward(doc.row(cy)?, query, 0) {
            return Some(MatchPos { cy, cx });
        }
    }

    None
}

/// Find the next match of `query` searching backward from `(cy, cx)`.
///
/// Matches starting at or before `cx` on the starting row are included —
/// to skip a match already under the cursor, pass `cx - 1` (or wrap to the
/// previous row with `cx = usize::MAX` for "anywhere on the row"). Wraps
/// around the start of the document.
#[must_use]
pub fn find_backward(doc: &Document, query: &[u8], from: MatchPos) -> Option<MatchPos> {
    if query.is_empty() || doc.row_count() == 0 {
        return None;
    }

    let count = doc.row_count();
    for offset in 0..count {
        let cy = (from.cy % count + count - offset) % count;
        let before = if offset == 0 { from.cx } else { usize::MAX };

        if let Some(cx) = search_row_backward(doc.row(cy)?, query, before) {
            return Some(MatchPos { cy, cx });
        }
    }

    // Wrap tail: the starting row was only searched up to `from.cx`; check
    // the rest of it.
    search_row_backward(doc.row(from.cy % count)?, query, usize::MAX)
        .map(|cx| MatchPos { cy: from.cy % count, cx })
}

/// Find the next match in the given direction.
#[must_use]
pub fn find(
    doc: &Document,
    query: &[u8],
    from: MatchPos,
    direction: SearchDirection,
) -> Option<MatchPos> {
    match direction {
        SearchDirection::Forward => find_forward(doc, query, from),
        SearchDirection::Backward => find_backward(doc, query, from),
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Search forward within a single row starting at `from_cx`.
fn search_row_forward(row: &Row, query: &[u8], from_cx: usize) -> Option<usize> {
    let chars = row.chars();
    if from_cx >= chars.len() {
        return None;
    }
    chars[from_cx..]
        .windows(query.len())
        .position(|w| w == query)
        .map(|p| from_cx + p)
}

/// Search backward within a single row, finding the last match starting at
/// or before `before_cx`. Pass `usize::MAX` to search the entire row.
fn search_row_backward(row: &Row, query: &[u8], before_cx: usize) -> Option<usize> {
    let chars = row.chars();
    let end = before_cx.saturating_add(query.len()).min(chars.len());
    chars[..end]
        .windows(query.len())
        .rposition(|w| w == query)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(lines: &[&[u8]]) -> Document {
        let mut doc = Document::new();
        for (i, line) in lines.iter().enumerate() {
            doc.insert_row(i, line.to_vec());
        }
        doc
    }

    const fn at(cy: usize, cx: usize) -> MatchPos {
        MatchPos { cy, cx }
    }

    // -- SearchDirection ----------------------------------------------------

    #[test]
    fn direction_opposite() {
        assert_eq!(SearchDirection::Forward.opposite(), SearchDirection::Backward);
        assert_eq!(SearchDirection::Backward.opposite(), SearchDirection::Forward);
    }

    // -- find_forward -------------------------------------------------------

    #[test]
    fn forward_basic() {
        let doc = doc_with(&[b"hello world hello"]);
        assert_eq!(find_forward(&doc, b"hello", at(0, 0)), Some(at(0, 0)));
    }

    #[test]
    fn forward_skip_current() {
        let doc = doc_with(&[b"hello world hello"]);
        assert_eq!(find_forward(&doc, b"hello", at(0, 1)), Some(at(0, 12)));
    }

    #[test]
    fn forward_multi_row() {
        let doc = doc_with(&[b"foo", b"bar", b"baz"]);
        assert_eq!(find_forward(&doc, b"bar", at(0, 0)), Some(at(1, 0)));
    }

    #[test]
    fn forward_wraps_around() {
        let doc = doc_with(&[b"hello world"]);
        assert_eq!(find_forward(&doc, b"hello", at(0, 6)), Some(at(0, 0)));
    }

    #[test]
    fn forward_wraps_multi_row() {
        let doc = doc_with(&[b"foo", b"bar", b"baz"]);
        assert_eq!(find_forward(&doc, b"foo", at(2, 0)), Some(at(0, 0)));
    }

    #[test]
    fn forward_no_match() {
        let doc = doc_with(&[b"hello world"]);
        assert!(find_forward(&doc, b"xyz", at(0, 0)).is_none());
    }

    #[test]
    fn forward_empty_query() {
        let doc = doc_with(&[b"hello"]);
        assert!(find_forward(&doc, b"", at(0, 0)).is_none());
    }

    #[test]
    fn forward_empty_document() {
        let doc = Document::new();
        assert!(find_forward(&doc, b"hello", at(0, 0)).is_none());
    }

    #[test]
    fn forward_from_past_row_end() {
        let doc = doc_with(&[b"abc", b"def"]);
        assert_eq!(find_forward(&doc, b"def", at(0, 3)), Some(at(1, 0)));
    }

    #[test]
    fn forward_multiple_on_same_row() {
        let doc = doc_with(&[b"abcabc"]);
        assert_eq!(find_forward(&doc, b"abc", at(0, 1)), Some(at(0, 3)));
    }

    #[test]
    fn forward_matches_opaque_bytes() {
        let doc = doc_with(&[&[0xDE, 0xAD, 0xBE, 0xEF][..]]);
        assert_eq!(
            find_forward(&doc, &[0xBE, 0xEF], at(0, 0)),
            Some(at(0, 2))
        );
    }

    // -- find_backward ------------------------------------------------------

    #[test]
    fn backward_basic() {
        let doc = doc_with(&[b"hello world hello"]);
        assert_eq!(find_backward(&doc, b"hello", at(0, 16)), Some(at(0, 12)));
    }

    #[test]
    fn backward_from_match_start_is_inclusive() {
        let doc = doc_with(&[b"hello world hello"]);
        assert_eq!(find_backward(&doc, b"hello", at(0, 12)), Some(at(0, 12)));
    }

    #[test]
    fn backward_skips_to_previous() {
        let doc = doc_with(&[b"hello world hello"]);
        assert_eq!(find_backward(&doc, b"hello", at(0, 11)), Some(at(0, 0)));
    }

    #[test]
    fn backward_multi_row() {
        let doc = doc_with(&[b"foo", b"bar", b"baz"]);
        assert_eq!(find_backward(&doc, b"foo", at(2, 0)), Some(at(0, 0)));
    }

    #[test]
    fn backward_wraps_around() {
        let doc = doc_with(&[b"foo", b"bar", b"baz"]);
        assert_eq!(find_backward(&doc, b"baz", at(0, 0)), Some(at(2, 0)));
    }

    #[test]
    fn backward_no_match() {
        let doc = doc_with(&[b"hello world"]);
        assert!(find_backward(&doc, b"xyz", at(0, 10)).is_none());
    }

    #[test]
    fn backward_whole_row_marker() {
        let doc = doc_with(&[b"abc abc"]);
        assert_eq!(
            find_backward(&doc, b"abc", at(0, usize::MAX)),
            Some(at(0, 4))
        );
    }

    // -- find (direction dispatch) ------------------------------------------

    #[test]
    fn find_dispatches_forward() {
        let doc = doc_with(&[b"hello world"]);
        assert_eq!(
            find(&doc, b"world", at(0, 0), SearchDirection::Forward),
            Some(at(0, 6))
        );
    }

    #[test]
    fn find_dispatches_backward() {
        let doc = doc_with(&[b"hello world"]);
        assert_eq!(
            find(&doc, b"hello", at(0, 10), SearchDirection::Backward),
            Some(at(0, 0))
        );
    }

    // -- Edge cases ---------------------------------------------------------

    #[test]
    fn single_byte_query() {
        let doc = doc_with(&[b"x"]);
        assert_eq!(find_forward(&doc, b"x", at(0, 0)), Some(at(0, 0)));
    }

    #[test]
    fn query_longer_than_row() {
        let doc = doc_with(&[b"ab"]);
        assert!(find_forward(&doc, b"abc", at(0, 0)).is_none());
    }

    #[test]
    fn match_at_row_end() {
        let doc = doc_with(&[b"hello"]);
        assert_eq!(find_forward(&doc, b"lo", at(0, 0)), Some(at(0, 3)));
    }

    #[test]
    fn case_sensitive() {
        let doc = doc_with(&[b"Hello hello"]);
        assert_eq!(find_forward(&doc, b"hello", at(0, 0)), Some(at(0, 6)));
    }

    #[test]
    fn stepping_through_all_matches_forward() {
        let doc = doc_with(&[b"aXa", b"Xb", b"ccX"]);
        let mut pos = at(0, 0);
        let mut hits = Vec::new();
        for _ in 0..3 {
            let m = find_forward(&doc, b"X", pos).unwrap();
            hits.push(m);
            pos = at(m.cy, m.cx + 1);
        }
        assert_eq!(hits, vec![at(0, 1), at(1, 0), at(2, 2)]);
        // One more step wraps back to the first.
        assert_eq!(find_forward(&doc, b"X", pos), Some(at(0, 1)));
    }
}
