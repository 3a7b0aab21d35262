//! Editor — the one explicit session object.
//!
//! Owns the [`Document`], the logical cursor `(cx, cy)`, the [`Viewport`],
//! the screen dimensions, the status message, and the quit-confirmation
//! countdown. Every component receives this struct by reference; there is
//! no ambient global state anywhere in the editor.
//!
//! # Cursor model
//!
//! `cy` ranges over `[0, row_count]` — the top value is the virtual row
//! past end-of-file. `cx` is a content-byte offset in `[0, row_len(cy)]`.
//! The render column `rx` is derived on demand and never stored: it is
//! recomputed from `(cx, cy)` each frame, so it cannot drift out of sync
//! with the tab expansion.

use std::time::{Duration, Instant};

use tilde_term::terminal::Size;

use crate::document::Document;
use crate::view::Viewport;

/// How many times a dirty quit must be confirmed before it proceeds.
pub const QUIT_TIMES: u8 = 3;

/// How long a status message stays visible.
const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Rows reserved below the text area: status bar and message bar.
const CHROME_ROWS: u16 = 2;

// ---------------------------------------------------------------------------
// Arrow
// ---------------------------------------------------------------------------

/// A cursor motion direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Left,
    Right,
    Up,
    Down,
}

// ---------------------------------------------------------------------------
// StatusMessage
// ---------------------------------------------------------------------------

/// A transient one-line message shown in the message bar.
#[derive(Debug)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    fn empty() -> Self {
        Self {
            text: String::new(),
            set_at: Instant::now(),
        }
    }

    fn set(&mut self, text: String) {
        self.text = text;
        self.set_at = Instant::now();
    }

    /// The message, or `None` once it has aged out.
    fn fresh(&self) -> Option<&str> {
        if !self.text.is_empty() && self.set_at.elapsed() < MESSAGE_TTL {
            Some(&self.text)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Complete editing-session state.
#[derive(Debug)]
pub struct Editor {
    doc: Document,
    /// Cursor column: content-byte offset into the row at `cy`.
    cx: usize,
    /// Cursor row: `[0, row_count]`, top value = virtual row past EOF.
    cy: usize,
    view: Viewport,
    /// Text-area height (terminal rows minus status and message bars).
    screen_rows: usize,
    /// Text-area width.
    screen_cols: usize,
    status: StatusMessage,
    quit_times: u8,
}

impl Editor {
    /// Create a session over `doc` for a terminal of the given size.
    ///
    /// Two rows are reserved for the status and message bars; the text
    /// area gets the rest.
    #[must_use]
    pub fn new(doc: Document, size: Size) -> Self {
        Self {
            doc,
            cx: 0,
            cy: 0,
            view: Viewport::new(),
            screen_rows: size.rows.saturating_sub(CHROME_ROWS) as usize,
            screen_cols: size.cols as usize,
            status: StatusMessage::empty(),
            quit_times: QUIT_TIMES,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// The document.
    #[inline]
    #[must_use]
    pub const fn doc(&self) -> &Document {
        &self.doc
    }

    /// The document, mutably.
    #[inline]
    pub const fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Cursor column (content-byte offset).
    #[inline]
    #[must_use]
    pub const fn cx(&self) -> usize {
        self.cx
    }

    /// Cursor row.
    #[inline]
    #[must_use]
    pub const fn cy(&self) -> usize {
        self.cy
    }

    /// The scroll offsets.
    #[inline]
    #[must_use]
    pub const fn view(&self) -> Viewport {
        self.view
    }

    /// Text-area height in rows.
    #[inline]
    #[must_use]
    pub const fn screen_rows(&self) -> usize {
        self.screen_rows
    }

    /// Text-area width in columns.
    #[inline]
    #[must_use]
    pub const fn screen_cols(&self) -> usize {
        self.screen_cols
    }

    /// The cursor's render column, derived from `(cx, cy)`.
    #[must_use]
    pub fn rx(&self) -> usize {
        self.doc.row(self.cy).map_or(0, |row| row.cx_to_rx(self.cx))
    }

    // -- Status message -----------------------------------------------------

    /// Set the status message (restarts its visibility window).
    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status.set(text.into());
    }

    /// The status message, if it was set within the last few seconds.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.fresh()
    }

    // -- Cursor motion ------------------------------------------------------

    /// Move the cursor one step in `arrow`'s direction.
    ///
    /// Left at column 0 wraps to the end of the previous row; Right at the
    /// end of a row wraps to column 0 of the next. Vertical motion clamps
    /// `cy` to `[0, row_count]`, and after any move the column is clamped
    /// to the (possibly shorter) new row's length.
    pub fn move_cursor(&mut self, arrow: Arrow) {
        match arrow {
            Arrow::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = self.doc.row_len(self.cy);
                }
            }
            Arrow::Right => {
                let len = self.doc.row_len(self.cy);
                if self.cx < len {
                    self.cx += 1;
                } else if self.cy < self.doc.row_count() {
                    self.cy += 1;
                    self.cx = 0;
                }
            }
            Arrow::Up => {
                self.cy = self.cy.saturating_sub(1);
            }
            Arrow::Down => {
                if self.cy < self.doc.row_count() {
                    self.cy += 1;
                }
            }
        }
        self.clamp_cx();
    }

    /// Jump to the start of the current row.
    pub const fn line_home(&mut self) {
        self.cx = 0;
    }

    /// Jump past the last byte of the current row.
    pub fn line_end(&mut self) {
        self.cx = self.doc.row_len(self.cy);
    }

    /// Move a screenful up: snap to the viewport's top row, then step one
    /// screen of rows further.
    pub fn page_up(&mut self) {
        self.cy = self.view.row_off;
        for _ in 0..self.screen_rows {
            self.move_cursor(Arrow::Up);
        }
    }

    /// Move a screenful down: snap to the viewport's bottom row, then step
    /// one screen of rows further.
    pub fn page_down(&mut self) {
        self.cy = (self.view.row_off + self.screen_rows)
            .saturating_sub(1)
            .min(self.doc.row_count());
        for _ in 0..self.screen_rows {
            self.move_cursor(Arrow::Down);
        }
    }

    /// Place the cursor at `(cy, cx)`, clamped to valid coordinates.
    pub fn set_cursor(&mut self, cy: usize, cx: usize) {
        self.cy = cy.min(self.doc.row_count());
        self.cx = cx;
        self.clamp_cx();
    }

    /// Restore saved scroll offsets (used when a find is cancelled).
    pub const fn set_view(&mut self, view: Viewport) {
        self.view = view;
    }

    /// Clamp the column to the current row's length.
    fn clamp_cx(&mut self) {
        let len = self.doc.row_len(self.cy);
        if self.cx > len {
            self.cx = len;
        }
    }

    // -- Editing ------------------------------------------------------------

    /// Insert a byte at the cursor and advance past it.
    pub fn insert_char(&mut self, byte: u8) {
        self.doc.insert_char(self.cy, self.cx, byte);
        self.cx += 1;
    }

    /// Split the current line at the cursor; the cursor lands at the start
    /// of the new row. On the virtual row past EOF an empty row is
    /// inserted instead.
    pub fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.doc.insert_row(self.cy, Vec::new());
        } else {
            self.doc.split_row(self.cy, self.cx);
        }
        self.cy += 1;
        self.cx = 0;
    }

    /// Delete the byte before the cursor; at column 0 this merges the
    /// current row into the previous one and the cursor lands at the seam.
    pub fn delete_char(&mut self) {
        if let Some((cy, cx)) = self.doc.delete_char(self.cy, self.cx) {
            self.cy = cy;
            self.cx = cx;
        }
    }

    // -- Scrolling ----------------------------------------------------------

    /// Restore the viewport invariants for the current cursor position.
    /// Runs unconditionally before every frame.
    pub fn scroll(&mut self) {
        let rx = self.rx();
        self.view
            .scroll(self.cy, rx, self.screen_rows, self.screen_cols);
    }

    // -- Quit confirmation --------------------------------------------------

    /// Handle a quit request.
    ///
    /// Returns `true` when quitting may proceed: the document is clean, or
    /// the countdown has been exhausted. Otherwise decrements the
    /// countdown, posts a warning, and returns `false`.
    pub fn confirm_quit(&mut self) -> bool {
        if !self.doc.is_dirty() || self.quit_times == 0 {
            return true;
        }
        self.set_status(format!(
            "WARNING! File has unsaved changes. Press Ctrl-Q {} more times to quit.",
            self.quit_times
        ));
        self.quit_times -= 1;
        false
    }

    /// Restart the quit countdown. Called for every command that is not a
    /// quit request.
    pub const fn reset_quit_times(&mut self) {
        self.quit_times = QUIT_TIMES;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
