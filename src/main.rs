// SPDX-License-Identifier: MIT
//
// tilde — a minimal terminal text editor.
//
// This is the main binary that wires together the two crates:
//
//   tilde-term   → raw mode, key decoding, ANSI output, frame buffer
//   tilde-editor → rows, document, cursor/viewport, search, rendering
//
// The Session struct owns the terminal and the editor state and runs the
// loop. Each keypress flows through:
//
//   stdin byte → parser → KeyEvent → dispatch → document/cursor mutation
//   refresh → screen::compose → one write to the terminal
//
// The loop is strictly render → blocking read → dispatch: rendering and
// input handling never interleave, and a key is fully dispatched before
// the next read begins. The only suspension point is the byte read, whose
// ~100ms deadline exists solely to resolve lone-ESC ambiguity.
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 2
//   ├──────────────────────────────┤
//   │ status bar (inverted video)  │  ← 1 row
//   ├──────────────────────────────┤
//   │ message bar                  │  ← 1 row
//   └──────────────────────────────┘

use std::collections::VecDeque;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use tilde_editor::document::Document;
use tilde_editor::editor::{Arrow, Editor};
use tilde_editor::screen;
use tilde_editor::search::{self, MatchPos};

use tilde_term::ansi;
use tilde_term::input::{KeyCode, KeyEvent, Modifiers, Parser};
use tilde_term::output::OutputBuffer;
use tilde_term::terminal::Terminal;

/// Shown in the message bar at startup.
const HELP: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

// ─── Dispatch ───────────────────────────────────────────────────────────────

/// What the session must do after a key has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Keep editing.
    Continue,
    /// Run the save flow (may prompt for a filename).
    Save,
    /// Run the incremental find flow.
    Find,
    /// Leave the editor.
    Quit,
}

/// Apply one key event to the editor state.
///
/// Everything that needs no terminal interaction happens right here;
/// save and find are returned as actions because their prompts need the
/// refresh/read machinery. Any key that is not a quit request restarts
/// the quit-confirmation countdown.
fn dispatch(ed: &mut Editor, key: KeyEvent) -> Action {
    if key.is_ctrl('q') {
        return if ed.confirm_quit() {
            Action::Quit
        } else {
            Action::Continue
        };
    }

    let mut action = Action::Continue;

    if key.is_ctrl('s') {
        action = Action::Save;
    } else if key.is_ctrl('f') {
        action = Action::Find;
    } else {
        match key.code {
            KeyCode::Enter => ed.insert_newline(),
            KeyCode::Backspace => ed.delete_char(),
            KeyCode::Delete => {
                // Forward delete: step onto the byte, then delete before.
                ed.move_cursor(Arrow::Right);
                ed.delete_char();
            }
            KeyCode::Up => ed.move_cursor(Arrow::Up),
            KeyCode::Down => ed.move_cursor(Arrow::Down),
            KeyCode::Left => ed.move_cursor(Arrow::Left),
            KeyCode::Right => ed.move_cursor(Arrow::Right),
            KeyCode::Home => ed.line_home(),
            KeyCode::End => ed.line_end(),
            KeyCode::PageUp => ed.page_up(),
            KeyCode::PageDown => ed.page_down(),
            KeyCode::Tab => ed.insert_char(b'\t'),
            // Escape and unbound Ctrl chords (Ctrl-L among them) are
            // no-ops beyond the refresh every key triggers.
            KeyCode::Escape => {}
            KeyCode::Char(_) if key.modifiers.contains(Modifiers::CTRL) => {}
            #[allow(clippy::cast_possible_truncation)]
            KeyCode::Char(ch) => ed.insert_char(ch as u8),
        }
    }

    ed.reset_quit_times();
    action
}

// ─── Prompt events ──────────────────────────────────────────────────────────

/// What just happened inside the modal prompt loop.
///
/// Find uses these to drive incremental search; the save-as prompt
/// ignores everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptEvent {
    /// The input buffer changed (typed byte or backspace).
    Edited,
    /// Right/Down — jump to the next match.
    Next,
    /// Left/Up — jump to the previous match.
    Prev,
    /// Enter — the input was committed.
    Done,
    /// ESC — the prompt was aborted.
    Cancel,
}

// ─── Session ────────────────────────────────────────────────────────────────

/// The running editor: terminal, key decoder, frame buffer, editor state.
struct Session {
    term: Terminal,
    parser: Parser,
    pending: VecDeque<KeyEvent>,
    out: OutputBuffer,
    ed: Editor,
}

impl Session {
    /// Build a session over `doc`. Fails if the terminal size cannot be
    /// determined — an unrecoverable precondition.
    fn new(doc: Document) -> io::Result<Self> {
        let term = Terminal::new()?;
        let mut ed = Editor::new(doc, term.size());
        ed.set_status(HELP);

        Ok(Self {
            term,
            parser: Parser::new(),
            pending: VecDeque::new(),
            out: OutputBuffer::new(),
            ed,
        })
    }

    /// Enter raw mode and run the editor until quit. The terminal is
    /// restored on the way out even when the loop fails.
    fn run(&mut self) -> io::Result<()> {
        self.term.enter()?;
        let result = self.main_loop();
        let cleanup = self.cleanup();
        result.and(cleanup)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        loop {
            screen::refresh(&mut self.ed, &mut self.out)?;
            let key = self.read_key()?;
            match dispatch(&mut self.ed, key) {
                Action::Continue => {}
                Action::Save => self.save()?,
                Action::Find => self.find()?,
                Action::Quit => return Ok(()),
            }
        }
    }

    /// Clear the screen and leave raw mode.
    fn cleanup(&mut self) -> io::Result<()> {
        self.out.clear();
        ansi::clear_screen(&mut self.out)?;
        ansi::cursor_home(&mut self.out)?;
        self.out.flush_stdout()?;
        self.term.leave()
    }

    /// Block until one logical key event is available.
    ///
    /// Feeds the decoder byte by byte. When the read deadline expires with
    /// an unfinished escape sequence pending, the decoder is flushed so a
    /// lone ESC surfaces as a real Escape keypress.
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(key);
            }
            match self.term.read_byte()? {
                Some(byte) => self.pending.extend(self.parser.advance(&[byte])),
                None => {
                    if self.parser.has_pending() {
                        self.pending.extend(self.parser.flush());
                    }
                }
            }
        }
    }

    // ── Save ────────────────────────────────────────────────────────

    /// Save the document, prompting for a filename if none is set.
    ///
    /// A failed write is surfaced in the message bar; the in-memory
    /// document (dirty flag included) is left untouched.
    fn save(&mut self) -> io::Result<()> {
        if self.ed.doc().path().is_none() {
            let Some(name) = self.prompt("Save as (ESC to cancel): ", |_, _, _| {})? else {
                self.ed.set_status("Save aborted");
                return Ok(());
            };
            self.ed.doc_mut().set_path(PathBuf::from(name));
        }

        match self.ed.doc_mut().save() {
            Ok(len) => self.ed.set_status(format!("{len} bytes written to disk")),
            Err(err) => self.ed.set_status(format!("Can't save! I/O error: {err}")),
        }
        Ok(())
    }

    // ── Find ────────────────────────────────────────────────────────

    /// Incremental find with match navigation.
    ///
    /// Typing re-searches forward from where the cursor was when find
    /// began; Right/Down and Left/Up step through matches with wrap;
    /// Enter keeps the landing position; ESC restores cursor and scroll.
    fn find(&mut self) -> io::Result<()> {
        let saved_cx = self.ed.cx();
        let saved_cy = self.ed.cy();
        let saved_view = self.ed.view();

        let mut last: Option<MatchPos> = None;

        self.prompt(
            "Search (arrows to navigate, ESC to cancel): ",
            move |ed, input, event| {
                let query = input.as_bytes();
                let origin = MatchPos {
                    cy: saved_cy,
                    cx: saved_cx,
                };

                let found = match event {
                    PromptEvent::Edited => {
                        last = None;
                        search::find_forward(ed.doc(), query, origin)
                    }
                    PromptEvent::Next => {
                        let from = last.map_or(origin, |m| MatchPos {
                            cy: m.cy,
                            cx: m.cx + 1,
                        });
                        search::find_forward(ed.doc(), query, from)
                    }
                    PromptEvent::Prev => {
                        let from = last.map_or(origin, |m| {
                            if m.cx > 0 {
                                MatchPos {
                                    cy: m.cy,
                                    cx: m.cx - 1,
                                }
                            } else {
                                // Step off the row head: previous row,
                                // searched in full, wrapping at the top.
                                let count = ed.doc().row_count().max(1);
                                MatchPos {
                                    cy: (m.cy + count - 1) % count,
                                    cx: usize::MAX,
                                }
                            }
                        });
                        search::find_backward(ed.doc(), query, from)
                    }
                    PromptEvent::Cancel => {
                        ed.set_cursor(saved_cy, saved_cx);
                        ed.set_view(saved_view);
                        return;
                    }
                    PromptEvent::Done => return,
                };

                if let Some(m) = found {
                    last = Some(m);
                    ed.set_cursor(m.cy, m.cx);
                }
            },
        )?;
        Ok(())
    }

    // ── Prompt Controller ───────────────────────────────────────────

    /// Modal input loop in the message bar.
    ///
    /// Shows `label` plus the live input, refreshing on every keystroke.
    /// Backspace/Delete truncate; ESC aborts and returns `None`; Enter
    /// commits a non-empty buffer; printable bytes append. Arrow keys are
    /// reported to `on_key` for callers that navigate (find). The
    /// surrounding main loop is suspended until this returns.
    fn prompt<F>(&mut self, label: &str, mut on_key: F) -> io::Result<Option<String>>
    where
        F: FnMut(&mut Editor, &str, PromptEvent),
    {
        let mut input = String::new();
        loop {
            self.ed.set_status(format!("{label}{input}"));
            screen::refresh(&mut self.ed, &mut self.out)?;

            let key = self.read_key()?;
            match key.code {
                KeyCode::Backspace | KeyCode::Delete => {
                    input.pop();
                    on_key(&mut self.ed, &input, PromptEvent::Edited);
                }
                KeyCode::Escape => {
                    self.ed.set_status("");
                    on_key(&mut self.ed, &input, PromptEvent::Cancel);
                    return Ok(None);
                }
                KeyCode::Enter => {
                    if !input.is_empty() {
                        self.ed.set_status("");
                        on_key(&mut self.ed, &input, PromptEvent::Done);
                        return Ok(Some(input));
                    }
                }
                KeyCode::Right | KeyCode::Down => {
                    on_key(&mut self.ed, &input, PromptEvent::Next);
                }
                KeyCode::Left | KeyCode::Up => {
                    on_key(&mut self.ed, &input, PromptEvent::Prev);
                }
                KeyCode::Char(ch) if !key.modifiers.contains(Modifiers::CTRL) => {
                    input.push(ch);
                    on_key(&mut self.ed, &input, PromptEvent::Edited);
                }
                _ => {}
            }
        }
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let doc = env::args().nth(1).map_or_else(Document::new, |path| {
        Document::open(Path::new(&path)).unwrap_or_else(|err| {
            eprintln!("tilde: {path}: {err}");
            process::exit(1);
        })
    });

    let mut session = Session::new(doc).unwrap_or_else(|err| {
        eprintln!("tilde: failed to initialize terminal: {err}");
        process::exit(1);
    });

    if let Err(err) = session.run() {
        eprintln!("tilde: {err}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tilde_term::terminal::Size;

    // ── Helpers ───────────────────────────────────────────────────────────

    const SIZE: Size = Size { cols: 40, rows: 12 }; // 10 text rows

    /// Create a key press event for a character.
    const fn press_char(ch: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::empty(),
        }
    }

    /// Create a named-key press event.
    const fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Create a Ctrl chord event.
    const fn ctrl(ch: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: Modifiers::CTRL,
        }
    }

    fn editor_with(text: &[u8]) -> Editor {
        let mut doc = Document::new();
        doc.load(text);
        Editor::new(doc, SIZE)
    }

    /// Feed a sequence of keys through dispatch, asserting none of them
    /// requests quit.
    fn feed(ed: &mut Editor, keys: &[KeyEvent]) {
        for &key in keys {
            assert_ne!(dispatch(ed, key), Action::Quit);
        }
    }

    fn row(ed: &Editor, cy: usize) -> &[u8] {
        ed.doc().row(cy).unwrap().chars()
    }

    // ── Typing ────────────────────────────────────────────────────────────

    #[test]
    fn typing_inserts_at_cursor() {
        let mut ed = editor_with(b"");
        feed(&mut ed, &[press_char('h'), press_char('i')]);
        assert_eq!(row(&ed, 0), b"hi");
    }

    #[test]
    fn type_enter_type_scenario() {
        let mut ed = editor_with(b"");
        feed(
            &mut ed,
            &[
                press_char('a'),
                press_char('b'),
                press_char('c'),
                press(KeyCode::Enter),
                press_char('d'),
            ],
        );
        assert_eq!(ed.doc().row_count(), 2);
        assert_eq!(row(&ed, 0), b"abc");
        assert_eq!(row(&ed, 1), b"d");
    }

    #[test]
    fn tab_key_inserts_tab_byte() {
        let mut ed = editor_with(b"");
        feed(&mut ed, &[press(KeyCode::Tab), press_char('x')]);
        assert_eq!(row(&ed, 0), b"\tx");
    }

    #[test]
    fn unbound_ctrl_chord_inserts_nothing() {
        let mut ed = editor_with(b"abc\n");
        feed(&mut ed, &[ctrl('l'), ctrl('x'), press(KeyCode::Escape)]);
        assert_eq!(row(&ed, 0), b"abc");
        assert!(!ed.doc().is_dirty());
    }

    // ── Deletion ──────────────────────────────────────────────────────────

    #[test]
    fn backspace_removes_before_cursor() {
        let mut ed = editor_with(b"abc\n");
        feed(&mut ed, &[press(KeyCode::End), press(KeyCode::Backspace)]);
        assert_eq!(row(&ed, 0), b"ab");
    }

    #[test]
    fn delete_removes_at_cursor() {
        let mut ed = editor_with(b"abc\n");
        feed(&mut ed, &[press(KeyCode::Delete)]);
        assert_eq!(row(&ed, 0), b"bc");
        assert_eq!(ed.cx(), 0);
    }

    #[test]
    fn delete_at_row_end_joins_next_row() {
        let mut ed = editor_with(b"ab\ncd\n");
        feed(&mut ed, &[press(KeyCode::End), press(KeyCode::Delete)]);
        assert_eq!(ed.doc().row_count(), 1);
        assert_eq!(row(&ed, 0), b"abcd");
    }

    #[test]
    fn backspace_merge_scenario() {
        let mut ed = editor_with(b"abc\ndef\n");
        feed(&mut ed, &[press(KeyCode::Down), press(KeyCode::Backspace)]);
        assert_eq!(ed.doc().row_count(), 1);
        assert_eq!(row(&ed, 0), b"abcdef");
        assert_eq!((ed.cy(), ed.cx()), (0, 3));
    }

    // ── Motion ────────────────────────────────────────────────────────────

    #[test]
    fn arrows_move_the_cursor() {
        let mut ed = editor_with(b"abc\ndef\n");
        feed(
            &mut ed,
            &[
                press(KeyCode::Right),
                press(KeyCode::Down),
                press(KeyCode::Right),
            ],
        );
        assert_eq!((ed.cy(), ed.cx()), (1, 2));
    }

    #[test]
    fn home_and_end_jump_within_row() {
        let mut ed = editor_with(b"hello\n");
        feed(&mut ed, &[press(KeyCode::End)]);
        assert_eq!(ed.cx(), 5);
        feed(&mut ed, &[press(KeyCode::Home)]);
        assert_eq!(ed.cx(), 0);
    }

    #[test]
    fn page_keys_move_screenfuls() {
        let text: Vec<u8> = (0..40).flat_map(|i| format!("{i}\n").into_bytes()).collect();
        let mut ed = editor_with(&text);

        feed(&mut ed, &[press(KeyCode::PageDown)]);
        assert_eq!(ed.cy(), 19);
        feed(&mut ed, &[press(KeyCode::PageUp)]);
        assert_eq!(ed.cy(), 0);
    }

    // ── Save / Find actions ───────────────────────────────────────────────

    #[test]
    fn ctrl_s_requests_save() {
        let mut ed = editor_with(b"");
        assert_eq!(dispatch(&mut ed, ctrl('s')), Action::Save);
    }

    #[test]
    fn ctrl_f_requests_find() {
        let mut ed = editor_with(b"");
        assert_eq!(dispatch(&mut ed, ctrl('f')), Action::Find);
    }

    #[test]
    fn plain_s_is_just_a_character() {
        let mut ed = editor_with(b"");
        assert_eq!(dispatch(&mut ed, press_char('s')), Action::Continue);
        assert_eq!(row(&ed, 0), b"s");
    }

    // ── Quit flow ─────────────────────────────────────────────────────────

    #[test]
    fn clean_quit_is_immediate() {
        let mut ed = editor_with(b"abc\n");
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Quit);
    }

    #[test]
    fn dirty_quit_needs_three_confirmations() {
        let mut ed = editor_with(b"");
        feed(&mut ed, &[press_char('x')]);

        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Quit);
    }

    #[test]
    fn any_other_key_resets_quit_countdown() {
        let mut ed = editor_with(b"");
        feed(&mut ed, &[press_char('x')]);

        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        feed(&mut ed, &[press(KeyCode::Right)]); // resets the countdown

        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Continue);
        assert_eq!(dispatch(&mut ed, ctrl('q')), Action::Quit);
    }

    #[test]
    fn dirty_quit_posts_a_warning() {
        let mut ed = editor_with(b"");
        feed(&mut ed, &[press_char('x')]);
        dispatch(&mut ed, ctrl('q'));
        assert!(ed.status().unwrap().contains("unsaved changes"));
    }
}
