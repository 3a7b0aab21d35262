//! # tilde-editor — editor core for tilde
//!
//! This crate contains the fundamental building blocks of the editor:
//!
//! - **[`row`]** — one line of content plus its tab-expanded render form
//! - **[`document`]** — the row sequence, dirty tracking, and file I/O
//! - **[`view`]** — scroll offsets and the cursor-visibility invariant
//! - **[`editor`]** — the session object: cursor, motion, editing, quit
//!   confirmation, status message
//! - **[`search`]** — literal byte search with wrap-around
//! - **[`screen`]** — frame composition, one terminal write per refresh
//!
//! Terminal I/O itself lives in `tilde-term`; this crate only ever writes
//! into its in-memory output buffer.

pub mod document;
pub mod editor;
pub mod row;
pub mod screen;
pub mod search;
pub mod view;
