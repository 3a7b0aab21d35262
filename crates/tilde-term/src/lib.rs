// SPDX-License-Identifier: MIT

//! # tilde-term — terminal layer for tilde
//!
//! Everything that touches the terminal device lives here:
//!
//! - **[`terminal`]** — raw mode via termios, window-size query, RAII
//!   restore, and the deadline-bounded byte read
//! - **[`input`]** — escape-sequence decoder turning raw bytes into
//!   logical key events
//! - **[`ansi`]** — byte-exact escape sequence emission
//! - **[`output`]** — the frame buffer flushed in a single write
//!
//! The editor core consumes these through narrow interfaces and never
//! performs terminal I/O of its own.

pub mod ansi;
pub mod input;
pub mod output;
pub mod terminal;
