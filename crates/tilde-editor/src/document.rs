//! Document — the ordered sequence of rows that is the file being edited.
//!
//! A `Document` owns every [`Row`], the optional backing file path, and the
//! dirty counter. All content mutation goes through it; out-of-range
//! indices are clamped or ignored rather than panicking, because a stray
//! keystroke must never take the session down.
//!
//! # Coordinates
//!
//! `cy` is a row index; `cy == row_count()` denotes the virtual row just
//! past end-of-file (where the cursor sits on an empty document or after
//! the last line). `cx` is a byte offset into a row's content.
//!
//! # Dirty tracking
//!
//! `dirty` counts unsaved mutations. It is cleared by [`load`](
//! Document::load) and by a successful save, and only then — a failed save
//! leaves both the rows and the counter untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::row::Row;

/// The document: rows, backing path, and unsaved-change state.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    path: Option<PathBuf>,
    dirty: u64,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty document with no backing file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a file.
    ///
    /// The content is read as opaque bytes — no encoding conversion. Each
    /// line's trailing `\r`/`\n` bytes are stripped before storage. The
    /// document starts clean.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. Callers treat this as
    /// fatal at startup.
    pub fn open(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        let mut doc = Self::new();
        doc.path = Some(path.to_path_buf());
        doc.load(&data);
        Ok(doc)
    }

    /// Replace any existing content with rows parsed from `data`.
    ///
    /// Splits on `\n`; a trailing newline does not produce an extra empty
    /// row. Trailing `\r` bytes are stripped per line. Clears the dirty
    /// counter.
    pub fn load(&mut self, data: &[u8]) {
        self.rows.clear();
        if !data.is_empty() {
            let mut lines: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
            if data.ends_with(b"\n") {
                lines.pop();
            }
            for line in lines {
                let mut line = line;
                while let Some((&b'\r', head)) = line.split_last() {
                    line = head;
                }
                self.rows.push(Row::new(line.to_vec()));
            }
        }
        self.dirty = 0;
    }

    // -- Accessors ----------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by index. `None` past the last row.
    #[inline]
    #[must_use]
    pub fn row(&self, cy: usize) -> Option<&Row> {
        self.rows.get(cy)
    }

    /// Content length of a row, 0 for the virtual row past end-of-file.
    #[inline]
    #[must_use]
    pub fn row_len(&self, cy: usize) -> usize {
        self.rows.get(cy).map_or(0, Row::len)
    }

    /// The backing file path, if one is set.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the backing file path (save-as).
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// True when there are unsaved changes.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    // -- Editing ------------------------------------------------------------

    /// Insert a new row at `at`, shifting subsequent rows down.
    ///
    /// `at` past `row_count()` is a no-op (clamp policy: ignore).
    pub fn insert_row(&mut self, at: usize, bytes: impl Into<Vec<u8>>) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(bytes));
        self.dirty += 1;
    }

    /// Remove the row at `at` and return it. `None` when out of range.
    pub fn remove_row(&mut self, at: usize) -> Option<Row> {
        if at >= self.rows.len() {
            return None;
        }
        self.dirty += 1;
        Some(self.rows.remove(at))
    }

    /// Insert `byte` at `(cy, cx)`.
    ///
    /// On the virtual row past end-of-file an empty row is appended first.
    /// `cx` beyond the row length is clamped to the end.
    pub fn insert_char(&mut self, cy: usize, cx: usize, byte: u8) {
        if cy > self.rows.len() {
            return;
        }
        if cy == self.rows.len() {
            self.rows.push(Row::new(Vec::new()));
        }
        self.rows[cy].insert_char(cx, byte);
        self.dirty += 1;
    }

    /// Remove the byte immediately before `(cy, cx)`.
    ///
    /// Returns the cursor position after the deletion, or `None` if
    /// nothing changed. At `cx == 0` the row merges into the previous one
    /// — except for row 0 and the virtual row past end-of-file, where
    /// deleting is a no-op.
    pub fn delete_char(&mut self, cy: usize, cx: usize) -> Option<(usize, usize)> {
        if cy >= self.rows.len() {
            return None;
        }
        if cx > 0 {
            let cx = cx.min(self.rows[cy].len());
            self.rows[cy].delete_char(cx - 1);
            self.dirty += 1;
            return Some((cy, cx - 1));
        }
        if cy == 0 {
            return None;
        }
        let col = self.merge_row_into_previous(cy)?;
        Some((cy - 1, col))
    }

    /// Merge row `cy` into row `cy - 1`.
    ///
    /// The previous row's content becomes `prev ++ current` and row `cy`
    /// is removed. Returns the previous row's former length — the column
    /// where a cursor sitting at the merge point belongs. `None` for row 0
    /// or out-of-range rows.
    pub fn merge_row_into_previous(&mut self, cy: usize) -> Option<usize> {
        if cy == 0 || cy >= self.rows.len() {
            return None;
        }
        let row = self.remove_row(cy)?;
        let prev = &mut self.rows[cy - 1];
        let col = prev.len();
        prev.append(row.chars());
        Some(col)
    }

    /// Split row `cy` at `cx`: the suffix becomes a new row inserted
    /// immediately after. Out-of-range `cy` is a no-op.
    pub fn split_row(&mut self, cy: usize, cx: usize) {
        if cy >= self.rows.len() {
            return;
        }
        let tail = self.rows[cy].split_off(cx);
        self.rows.insert(cy + 1, Row::new(tail));
        self.dirty += 1;
    }

    // -- File I/O -----------------------------------------------------------

    /// The document as a single byte sequence: every row followed by `\n`.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let total: usize = self.rows.iter().map(|r| r.len() + 1).sum();
        let mut buf = Vec::with_capacity(total);
        for row in &self.rows {
            buf.extend_from_slice(row.chars());
            buf.push(b'\n');
        }
        buf
    }

    /// Write the document to its backing path.
    ///
    /// On success the dirty counter is cleared and the byte count written
    /// is returned. On failure the in-memory document — dirty counter
    /// included — is untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set or the write fails.
    pub fn save(&mut self) -> io::Result<usize> {
        let Some(path) = self.path.clone() else {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "no filename"));
        };
        let bytes = self.serialize();
        fs::write(path, &bytes)?;
        self.dirty = 0;
        Ok(bytes.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
