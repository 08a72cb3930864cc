//! # kilo-editor — Display core for kilo
//!
//! The state behind the screen and the code that draws it:
//!
//! - **[`buffer`]** — `TextBuffer` of raw-byte rows loaded from a file
//! - **[`cursor`]** — viewport-relative `Cursor` moved by navigation keys
//! - **[`compositor`]** — builds each frame into one output buffer
//! - **[`config`]** — banner text, filler glyph, quit key
//! - **[`editor`]** — `Editor`, the session that kilo-term's event loop drives
//!
//! Nothing here touches the terminal device; that is kilo-term's job.

pub mod buffer;
pub mod compositor;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;

pub use error::EditorError;
