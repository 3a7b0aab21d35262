//! Screen — composes one full terminal frame per refresh.
//!
//! The frame is built in memory as an append-only byte sequence and handed
//! to the terminal in a single write; partial writes would let the
//! terminal repaint mid-frame and the user would see tearing. The renderer
//! borrows the [`Editor`] for the duration of one frame build and holds no
//! state of its own across frames.
//!
//! Frame layout, top to bottom:
//!
//! ```text
//! ┌────────────────────────────────┐
//! │ text rows / ~ filler / banner  │ ← screen_rows
//! ├────────────────────────────────┤
//! │ status bar (inverted video)    │ ← 1 row
//! ├────────────────────────────────┤
//! │ message bar                    │ ← 1 row
//! └────────────────────────────────┘
//! ```
//!
//! Every frame starts by hiding the cursor and homing, and ends by placing
//! the cursor at its render position and showing it again — the terminal
//! never paints a cursor mid-composition.

use std::io::{self, Write};

use tilde_term::ansi;
use tilde_term::output::OutputBuffer;

use crate::editor::Editor;

/// Shown centered on an empty document.
const WELCOME: &str = concat!("tilde editor -- version ", env!("CARGO_PKG_VERSION"));

/// Status-bar filename field width.
const NAME_WIDTH: usize = 20;

/// Compose one frame into `out` and write it to the terminal.
///
/// # Errors
///
/// Returns an error if the final write to stdout fails.
pub fn refresh(ed: &mut Editor, out: &mut OutputBuffer) -> io::Result<()> {
    compose(ed, out)?;
    out.flush_stdout()
}

/// Compose one frame into `out` without flushing.
///
/// Restores the viewport invariants first, then draws text rows, status
/// bar, and message bar, and finally positions the cursor.
///
/// # Errors
///
/// Never fails against an [`OutputBuffer`]; the `io::Result` propagates
/// the `Write` contract.
pub fn compose(ed: &mut Editor, out: &mut OutputBuffer) -> io::Result<()> {
    ed.scroll();

    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;

    draw_rows(ed, out)?;
    draw_status_bar(ed, out)?;
    draw_message_bar(ed, out)?;

    // Cursor is inside the viewport after scroll(); both subtractions are
    // in range, and terminal coordinates comfortably fit u16.
    let view = ed.view();
    #[allow(clippy::cast_possible_truncation)]
    ansi::cursor_to(
        out,
        (ed.rx() - view.col_off) as u16,
        (ed.cy() - view.row_off) as u16,
    )?;
    ansi::cursor_show(out)?;
    Ok(())
}

/// Draw the text area: visible document rows, `~` filler past the end,
/// and the welcome banner on an empty document.
fn draw_rows(ed: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
    let view = ed.view();
    let cols = ed.screen_cols();

    for y in 0..ed.screen_rows() {
        let filerow = y + view.row_off;

        if let Some(row) = ed.doc().row(filerow) {
            let render = row.render();
            if view.col_off < render.len() {
                let end = (view.col_off + cols).min(render.len());
                out.write_all(&render[view.col_off..end])?;
            }
        } else if ed.doc().row_count() == 0 && y == ed.screen_rows() / 3 {
            draw_welcome(cols, out)?;
        } else {
            out.write_all(b"~")?;
        }

        ansi::clear_line(out)?;
        out.write_all(b"\r\n")?;
    }
    Ok(())
}

/// Draw the centered welcome banner, `~`-prefixed like any filler row.
fn draw_welcome(cols: usize, out: &mut OutputBuffer) -> io::Result<()> {
    let msg = &WELCOME.as_bytes()[..WELCOME.len().min(cols)];
    let mut padding = (cols - msg.len()) / 2;
    if padding > 0 {
        out.write_all(b"~")?;
        padding -= 1;
    }
    for _ in 0..padding {
        out.write_all(b" ")?;
    }
    out.write_all(msg)
}

/// Draw the inverted-video status bar: filename, line count, modified
/// marker on the left; `current/total` line indicator right-aligned.
fn draw_status_bar(ed: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
    ansi::invert_video(out)?;

    let name = ed
        .doc()
        .path()
        .map_or_else(|| String::from("[No Name]"), |p| p.display().to_string());
    let name: String = name.chars().take(NAME_WIDTH).collect();
    let modified = if ed.doc().is_dirty() { " (modified)" } else { "" };
    let left = format!("{name} - {} lines{modified}", ed.doc().row_count());
    let right = format!("{}/{}", ed.cy() + 1, ed.doc().row_count());

    let cols = ed.screen_cols();
    let mut len = left.len().min(cols);
    out.write_all(&left.as_bytes()[..len])?;

    while len < cols {
        if cols - len == right.len() {
            out.write_all(right.as_bytes())?;
            break;
        }
        out.write_all(b" ")?;
        len += 1;
    }

    ansi::reset_attrs(out)?;
    out.write_all(b"\r\n")
}

/// Draw the message bar: the status message while it is fresh, blank
/// otherwise.
fn draw_message_bar(ed: &Editor, out: &mut OutputBuffer) -> io::Result<()> {
    ansi::clear_line(out)?;
    if let Some(msg) = ed.status() {
        let msg = &msg.as_bytes()[..msg.len().min(ed.screen_cols())];
        out.write_all(msg)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
