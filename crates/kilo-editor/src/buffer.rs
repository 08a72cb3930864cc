//! Text buffer — the rows loaded from a file.
//!
//! A `TextBuffer` is an ordered list of [`TextRow`]s. Rows are raw bytes:
//! the display does not decode UTF-8, and a row is drawn by copying its
//! bytes to the terminal, truncated to the screen width.
//!
//! # Design choices
//!
//! - **Append-only.** Rows are built once at startup. Nothing edits them
//!   in place, so there is no gap buffer or rope here, just a `Vec`.
//!
//! - **Line endings are dropped on load.** Every trailing `\n` and `\r` is
//!   stripped, so `"bb\r\n"` becomes the two-byte row `"bb"`. The row never
//!   remembers which ending it had because nothing writes it back.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::EditorError;

// ---------------------------------------------------------------------------
// TextRow
// ---------------------------------------------------------------------------

/// One line of text, without its line ending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextRow {
    content: Vec<u8>,
}

impl TextRow {
    #[must_use]
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Remove every trailing `\n` and `\r`.
fn strip_line_ending(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// The rows of the open file, or none if no file was given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBuffer {
    rows: Vec<TextRow>,
}

impl TextBuffer {
    /// An empty buffer. The display shows the welcome banner.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Load the rows of the file at `path`.
    ///
    /// # Errors
    ///
    /// [`EditorError::Open`] if the file can't be opened,
    /// [`EditorError::Read`] if a line can't be read.
    pub fn load_file(path: &Path) -> Result<Self, EditorError> {
        let file = File::open(path).map_err(|source| EditorError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let buffer = Self::from_reader(BufReader::new(file)).map_err(|source| EditorError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), rows = buffer.row_count(), "file loaded");
        Ok(buffer)
    }

    /// Read rows from `reader` until end of input.
    ///
    /// A final line without a line ending still becomes a row.
    ///
    /// # Errors
    ///
    /// Any error from the reader other than end of input.
    pub fn from_reader(mut reader: impl BufRead) -> io::Result<Self> {
        let mut buffer = Self::new();
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            buffer.append_row(strip_line_ending(&line));
        }

        Ok(buffer)
    }

    /// Append a row after the last one.
    pub fn append_row(&mut self, content: &[u8]) {
        self.rows.push(TextRow::new(content));
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows were loaded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&TextRow> {
        self.rows.get(index)
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[TextRow] {
        &self.rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
