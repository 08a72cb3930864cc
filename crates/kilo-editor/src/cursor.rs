//! Cursor — a screen position moved by navigation keys.
//!
//! The cursor is viewport-relative: `(x, y)` is a cell on the screen, not a
//! position in the file. There is no scrolling, so it is clamped to the
//! screen, not to the text. It can sit past the end of a short row or
//! below the last row of the file.
//!
//! Every move saturates at the screen edge. Pressing Left in column 0 is a
//! no-op, not a wrap to the previous line.

use kilo_term::geometry::ScreenExtent;
use kilo_term::input::LogicalKey;

/// A cursor on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Column (0-indexed).
    x: u16,
    /// Row (0-indexed).
    y: u16,
}

impl Cursor {
    /// Create a cursor at the top-left corner.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Create a cursor at a specific cell, clamped to `extent`.
    #[must_use]
    pub fn at(x: u16, y: u16, extent: ScreenExtent) -> Self {
        Self {
            x: x.min(extent.cols.saturating_sub(1)),
            y: y.min(extent.rows.saturating_sub(1)),
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    #[inline]
    #[must_use]
    pub const fn y(&self) -> u16 {
        self.y
    }

    // -- Movement -----------------------------------------------------------

    /// Move for a navigation key. Returns `false` for keys that don't move
    /// the cursor.
    ///
    /// - Arrows: one cell, stopping at the edge.
    /// - Home / End: first / last column.
    /// - Page Up / Page Down: a screen's height up / down, which without
    ///   scrolling lands on the top / bottom row.
    pub fn move_by(&mut self, key: LogicalKey, extent: ScreenExtent) -> bool {
        let last_col = extent.cols.saturating_sub(1);
        let last_row = extent.rows.saturating_sub(1);

        match key {
            LogicalKey::ArrowLeft => self.x = self.x.saturating_sub(1),
            LogicalKey::ArrowRight => self.x = self.x.saturating_add(1).min(last_col),
            LogicalKey::ArrowUp => self.y = self.y.saturating_sub(1),
            LogicalKey::ArrowDown => self.y = self.y.saturating_add(1).min(last_row),
            LogicalKey::Home => self.x = 0,
            LogicalKey::End => self.x = last_col,
            LogicalKey::PageUp => self.y = self.y.saturating_sub(extent.rows),
            LogicalKey::PageDown => self.y = self.y.saturating_add(extent.rows).min(last_row),
            _ => return false,
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
