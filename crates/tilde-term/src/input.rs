// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical key events: printable characters,
// control chords, and named keys (arrows, Home/End, Page-Up/Down, Delete).
// Exactly one event per logical keypress.
//
// # Design
//
// The decoder maintains a small internal byte buffer because escape
// sequences can span multiple `read()` calls. Feed bytes with
// [`Parser::advance`], retrieve events from the returned `Vec`. After the
// read deadline expires with no new bytes, call [`Parser::flush`] to emit
// any pending lone ESC as a real Escape keypress.
//
// Parsing itself is a set of pure functions over `&[u8]` returning a
// [`Parsed`] verdict — event, incomplete, or skip. No hidden state, no
// silent fallthrough: every recognized sequence consumes an exact byte
// count, and every unrecognized sequence degrades to an Escape event
// rather than corrupting what follows.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Ctrl).
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// True when this event is the given Ctrl chord (e.g. `is_ctrl('q')`).
    #[must_use]
    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.contains(Modifiers::CTRL) && self.code == KeyCode::Char(ch)
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable ASCII character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Only Ctrl is observable through a raw byte stream without extended
    /// keyboard protocols: a control chord arrives as `byte & 0x1f`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0000_0001;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input decoder.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`KeyEvent`]s. The parser buffers incomplete escape sequences
/// internally and resumes when more bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be either a standalone Escape keypress
/// or the start of a multi-byte escape sequence. The parser keeps a lone
/// ESC pending. The caller waits out the read deadline and then calls
/// [`flush`](Parser::flush) to emit the pending ESC as a real Escape key.
pub struct Parser {
    /// Accumulated raw bytes waiting to be parsed.
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes from stdin and return all events that can be parsed.
    ///
    /// Bytes that form an incomplete sequence are kept in the internal
    /// buffer and will be combined with future [`advance`](Parser::advance)
    /// calls. Call [`flush`](Parser::flush) after the read deadline to
    /// emit any pending lone ESC.
    pub fn advance(&mut self, data: &[u8]) -> Vec<KeyEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        // Compact: remove consumed bytes, keep unconsumed remainder.
        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// Called after the read deadline expires to resolve the ESC
    /// ambiguity: a lone ESC byte becomes an Escape key event, and any
    /// other leftover bytes are decoded individually.
    pub fn flush(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        for &byte in &self.buf {
            if byte == 0x1B {
                events.push(press(KeyCode::Escape));
            } else if let Parsed::Event(event, _) = parse_plain(byte) {
                events.push(event);
            }
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────
//
// All parse functions are pure — they read from the front of a slice and
// return what they found plus how many bytes to consume. No mutable state.

/// Result of trying to parse one event from the buffer.
enum Parsed {
    /// Successfully parsed an event, consuming `usize` bytes.
    Event(KeyEvent, usize),
    /// Sequence is incomplete — need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

/// Try to parse a single event from the front of `buf`.
fn try_parse(buf: &[u8]) -> Parsed {
    match buf.first() {
        None => Parsed::Skip(0),
        Some(0x1B) => parse_escape(buf),
        Some(&b) => parse_plain(b),
    }
}

/// Decode a single non-ESC byte.
///
/// Control bytes are the `0x1f`-masked chords: 0x01 is Ctrl-A, 0x13 is
/// Ctrl-S. A few have dedicated key identities instead (Enter, Tab,
/// Backspace — including 0x08, which terminals send for Ctrl-H). Bytes
/// above 0x7F are not part of the ASCII content model and are skipped.
fn parse_plain(byte: u8) -> Parsed {
    match byte {
        0x0D | 0x0A => Parsed::Event(press(KeyCode::Enter), 1),
        0x09 => Parsed::Event(press(KeyCode::Tab), 1),
        0x08 | 0x7F => Parsed::Event(press(KeyCode::Backspace), 1),
        0x00 => Parsed::Event(ctrl_key('@'), 1),
        b @ (0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A) => {
            Parsed::Event(ctrl_key((b + b'a' - 1) as char), 1)
        }
        b @ 0x1C..=0x1F => Parsed::Event(ctrl_key((b + b'@') as char), 1),
        b @ 0x20..=0x7E => Parsed::Event(press(KeyCode::Char(b as char)), 1),
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf.first(), Some(&0x1B));

    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        // CSI: ESC [
        b'[' => parse_csi(buf),
        // SS3: ESC O
        b'O' => parse_ss3(buf),
        // Anything else: a standalone Escape. The next byte is left in
        // place and decoded on its own — degrading must never corrupt
        // subsequent input.
        _ => Parsed::Event(press(KeyCode::Escape), 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    // ── Tilde-terminated: ESC [ digit ~ ─────────────────────────────
    if buf[2].is_ascii_digit() {
        if buf.len() < 4 {
            return Parsed::Incomplete;
        }
        if buf[3] != b'~' {
            // Malformed — degrade to Escape, consuming the whole shape.
            return Parsed::Event(press(KeyCode::Escape), 4);
        }
        let code = match buf[2] {
            b'1' | b'7' => KeyCode::Home,
            b'3' => KeyCode::Delete,
            b'4' | b'8' => KeyCode::End,
            b'5' => KeyCode::PageUp,
            b'6' => KeyCode::PageDown,
            _ => KeyCode::Escape,
        };
        return Parsed::Event(press(code), 4);
    }

    // ── Letter-terminated: ESC [ A/B/C/D/H/F ────────────────────────
    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => KeyCode::Escape,
    };
    Parsed::Event(press(code), 3)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => KeyCode::Escape,
    };
    Parsed::Event(press(code), 3)
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Create a simple key press event with no modifiers.
const fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: Modifiers::empty(),
    }
}

/// Create a Ctrl+key press event.
const fn ctrl_key(ch: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(ch),
        modifiers: Modifiers::CTRL,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
