//! Row — one line of document content plus its rendered form.
//!
//! A `Row` owns two byte sequences: `chars`, the line's content exactly as
//! stored in the file (no newline, not necessarily valid UTF-8), and
//! `render`, the derived form where every tab expands to spaces up to the
//! next tab stop. `render` is recomputed by every mutator, so it is never
//! read stale.
//!
//! # Coordinate systems
//!
//! `cx` is a byte offset into `chars`; `rx` is a byte offset into `render`.
//! The two differ only where tabs appear. [`cx_to_rx`](Row::cx_to_rx) and
//! [`rx_to_cx`](Row::rx_to_cx) convert between them using the exact
//! expansion rule of [`update`](Row::update) — cursor-to-glyph alignment
//! depends on the three agreeing byte for byte.

/// Tab stop width in render columns. Tabs expand to the next multiple of 8.
pub const TAB_STOP: usize = 8;

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Content bytes, no embedded newline.
    chars: Vec<u8>,
    /// Tab-expanded content, kept in sync with `chars`.
    render: Vec<u8>,
}

impl Row {
    // -- Construction -------------------------------------------------------

    /// Create a row from content bytes. The rendered form is computed
    /// immediately.
    #[must_use]
    pub fn new(chars: impl Into<Vec<u8>>) -> Self {
        let mut row = Self {
            chars: chars.into(),
            render: Vec::new(),
        };
        row.update();
        row
    }

    // -- Accessors ----------------------------------------------------------

    /// The content bytes.
    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// The tab-expanded render bytes.
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Content length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// True when the row has no content.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a content byte offset to a render byte offset.
    ///
    /// Walks `chars[..cx]` accumulating rendered width: a tab advances to
    /// the next multiple of [`TAB_STOP`], everything else advances by one.
    /// `cx` beyond the row length is clamped.
    #[must_use]
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for &byte in &self.chars[..cx.min(self.chars.len())] {
            if byte == b'\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Convert a render byte offset back to a content byte offset.
    ///
    /// The inverse walk of [`cx_to_rx`](Self::cx_to_rx): returns the index
    /// of the content byte whose rendered span covers `rx`, or the row
    /// length if `rx` is past the rendered end.
    #[must_use]
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &byte) in self.chars.iter().enumerate() {
            if byte == b'\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    // -- Mutation ------------------------------------------------------------
    //
    // Every mutator ends by re-rendering. Out-of-range offsets are clamped
    // or ignored — a stray keystroke must never panic the session.

    /// Insert a byte at `at` (clamped to the row length).
    pub fn insert_char(&mut self, at: usize, byte: u8) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, byte);
        self.update();
    }

    /// Remove the byte at `at`. Out-of-range is a no-op.
    pub fn delete_char(&mut self, at: usize) {
        if at < self.chars.len() {
            self.chars.remove(at);
            self.update();
        }
    }

    /// Append bytes to the end of the row.
    pub fn append(&mut self, bytes: &[u8]) {
        self.chars.extend_from_slice(bytes);
        self.update();
    }

    /// Split the row at `at` (clamped): the suffix is returned and the row
    /// keeps the prefix.
    #[must_use]
    pub fn split_off(&mut self, at: usize) -> Vec<u8> {
        let at = at.min(self.chars.len());
        let tail = self.chars.split_off(at);
        self.update();
        tail
    }

    /// Recompute `render` from `chars`.
    ///
    /// Each tab becomes one space plus however many more reach the next
    /// multiple of [`TAB_STOP`] (1–8 total). O(row length); worst case the
    /// render is `len + 7 * tabs` bytes.
    fn update(&mut self) {
        self.render.clear();
        for &byte in &self.chars {
            if byte == b'\t' {
                self.render.push(b' ');
                while self.render.len() % TAB_STOP != 0 {
                    self.render.push(b' ');
                }
            } else {
                self.render.push(byte);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Rendering ----------------------------------------------------------

    #[test]
    fn plain_text_renders_unchanged() {
        let row = Row::new(*b"hello");
        assert_eq!(row.render(), b"hello");
    }

    #[test]
    fn empty_row() {
        let row = Row::new(*b"");
        assert!(row.is_empty());
        assert_eq!(row.len(), 0);
        assert_eq!(row.render(), b"");
    }

    #[test]
    fn tab_after_one_char_expands_to_column_eight() {
        // "a\tb" renders as "a       b": the tab fills 7 spaces to col 8.
        let row = Row::new(*b"a\tb");
        assert_eq!(row.render(), b"a       b");
    }

    #[test]
    fn leading_tab_expands_to_eight_spaces() {
        let row = Row::new(*b"\tx");
        assert_eq!(row.render(), b"        x");
    }

    #[test]
    fn tab_at_stop_boundary_expands_fully() {
        // 8 chars then a tab: the tab starts exactly on a stop, so it
        // expands to a full 8 spaces.
        let row = Row::new(*b"12345678\tx");
        assert_eq!(row.render(), b"12345678        x");
    }

    #[test]
    fn consecutive_tabs() {
        let row = Row::new(*b"\t\t");
        assert_eq!(row.render().len(), 16);
        assert!(row.render().iter().all(|&b| b == b' '));
    }

    #[test]
    fn non_utf8_bytes_pass_through() {
        let row = Row::new(vec![0xFF, b'\t', 0xFE]);
        assert_eq!(row.render()[0], 0xFF);
        assert_eq!(row.render()[8], 0xFE);
        assert_eq!(row.render().len(), 9);
    }

    // -- cx_to_rx -----------------------------------------------------------

    #[test]
    fn cx_to_rx_without_tabs_is_identity() {
        let row = Row::new(*b"hello");
        for cx in 0..=5 {
            assert_eq!(row.cx_to_rx(cx), cx);
        }
    }

    #[test]
    fn cx_to_rx_crosses_tab() {
        let row = Row::new(*b"a\tb");
        assert_eq!(row.cx_to_rx(0), 0);
        assert_eq!(row.cx_to_rx(1), 1); // on the tab
        assert_eq!(row.cx_to_rx(2), 8); // past the tab
        assert_eq!(row.cx_to_rx(3), 9);
    }

    #[test]
    fn cx_to_rx_clamps_past_end() {
        let row = Row::new(*b"ab");
        assert_eq!(row.cx_to_rx(99), 2);
    }

    #[test]
    fn cx_to_rx_agrees_with_render_length() {
        // For every prefix, the conversion must equal the rendered length
        // of that prefix — the property cursor placement depends on.
        let content = b"ab\tc\t\tdef\tx";
        let row = Row::new(*content);
        for cx in 0..=content.len() {
            let prefix = Row::new(content[..cx].to_vec());
            assert_eq!(row.cx_to_rx(cx), prefix.render().len(), "cx = {cx}");
        }
    }

    // -- rx_to_cx -----------------------------------------------------------

    #[test]
    fn rx_to_cx_without_tabs_is_identity() {
        let row = Row::new(*b"hello");
        for rx in 0..5 {
            assert_eq!(row.rx_to_cx(rx), rx);
        }
    }

    #[test]
    fn rx_to_cx_maps_tab_span_to_tab() {
        // "a\tb": render cols 1..8 all belong to the tab at cx 1.
        let row = Row::new(*b"a\tb");
        assert_eq!(row.rx_to_cx(0), 0);
        for rx in 1..8 {
            assert_eq!(row.rx_to_cx(rx), 1, "rx = {rx}");
        }
        assert_eq!(row.rx_to_cx(8), 2);
    }

    #[test]
    fn rx_to_cx_past_end_returns_len() {
        let row = Row::new(*b"a\tb");
        assert_eq!(row.rx_to_cx(100), 3);
    }

    #[test]
    fn rx_to_cx_inverts_cx_to_rx() {
        let row = Row::new(*b"x\ty\tz");
        for cx in 0..=row.len() {
            assert_eq!(row.rx_to_cx(row.cx_to_rx(cx)), cx.min(row.len()));
        }
    }

    // -- Mutation -----------------------------------------------------------

    #[test]
    fn insert_char_middle() {
        let mut row = Row::new(*b"ac");
        row.insert_char(1, b'b');
        assert_eq!(row.chars(), b"abc");
        assert_eq!(row.render(), b"abc");
    }

    #[test]
    fn insert_char_clamps_out_of_range() {
        let mut row = Row::new(*b"ab");
        row.insert_char(99, b'c');
        assert_eq!(row.chars(), b"abc");
    }

    #[test]
    fn insert_tab_rerenders() {
        let mut row = Row::new(*b"ab");
        row.insert_char(1, b'\t');
        assert_eq!(row.chars(), b"a\tb");
        assert_eq!(row.render(), b"a       b");
    }

    #[test]
    fn delete_char_middle() {
        let mut row = Row::new(*b"abc");
        row.delete_char(1);
        assert_eq!(row.chars(), b"ac");
    }

    #[test]
    fn delete_char_out_of_range_is_noop() {
        let mut row = Row::new(*b"abc");
        row.delete_char(3);
        assert_eq!(row.chars(), b"abc");
    }

    #[test]
    fn insert_then_delete_restores_row() {
        let mut row = Row::new(*b"hello");
        row.insert_char(2, b'X');
        row.delete_char(2);
        assert_eq!(row.chars(), b"hello");
        assert_eq!(row.render(), b"hello");
    }

    #[test]
    fn append_rerenders() {
        let mut row = Row::new(*b"a");
        row.append(b"\tb");
        assert_eq!(row.chars(), b"a\tb");
        assert_eq!(row.render(), b"a       b");
    }

    #[test]
    fn split_off_keeps_prefix() {
        let mut row = Row::new(*b"hello world");
        let tail = row.split_off(5);
        assert_eq!(row.chars(), b"hello");
        assert_eq!(tail, b" world");
    }

    #[test]
    fn split_off_at_zero_empties_row() {
        let mut row = Row::new(*b"abc");
        let tail = row.split_off(0);
        assert!(row.is_empty());
        assert_eq!(tail, b"abc");
    }

    #[test]
    fn split_off_clamps_past_end() {
        let mut row = Row::new(*b"abc");
        let tail = row.split_off(99);
        assert_eq!(row.chars(), b"abc");
        assert!(tail.is_empty());
    }

    #[test]
    fn split_then_append_restores_row() {
        let mut row = Row::new(*b"alpha\tbeta");
        let tail = row.split_off(4);
        row.append(&tail);
        assert_eq!(row.chars(), b"alpha\tbeta");
        assert_eq!(row.render(), Row::new(*b"alpha\tbeta").render());
    }
}
