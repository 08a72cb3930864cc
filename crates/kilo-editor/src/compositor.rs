//! Compositor — one frame, one buffer.
//!
//! [`compose_frame`] turns the buffer, the cursor, and the screen size into
//! the complete byte stream for one frame:
//!
//! ```text
//! ESC[?25l                  hide cursor
//! ESC[H                     home
//! <row 0> ESC[K \r\n        text, filler, or banner; erase the rest
//! <row 1> ESC[K \r\n
//! ...
//! <row N-1> ESC[K           last row: no \r\n, or the screen scrolls
//! ESC[<y+1>;<x+1>H          cursor to its tracked cell
//! ESC[?25h                  show cursor
//! ```
//!
//! The order matters. The cursor is hidden for the whole redraw so it
//! doesn't flicker across the screen while rows are drawn, and every row
//! erases its own tail so there is no full-screen clear to flash.
//!
//! Nothing here writes to the terminal. The caller flushes the buffer in
//! one write.

use std::io;

use kilo_term::ansi;
use kilo_term::geometry::ScreenExtent;
use kilo_term::output::OutputBuffer;

use crate::buffer::TextBuffer;
use crate::config::EditorConfig;
use crate::cursor::Cursor;

/// Append one complete frame to `out`.
///
/// # Errors
///
/// Only what writes into `out` report; an [`OutputBuffer`] never fails.
pub fn compose_frame(
    out: &mut OutputBuffer,
    buffer: &TextBuffer,
    cursor: Cursor,
    extent: ScreenExtent,
    config: &EditorConfig,
) -> io::Result<()> {
    ansi::cursor_hide(out)?;
    ansi::cursor_home(out)?;
    draw_rows(out, buffer, extent, config)?;
    ansi::cursor_to(out, cursor.x(), cursor.y())?;
    ansi::cursor_show(out)
}

/// The row the welcome banner goes on: a third of the way down.
#[inline]
#[must_use]
pub const fn banner_row(extent: ScreenExtent) -> u16 {
    extent.rows / 3
}

fn draw_rows(
    out: &mut OutputBuffer,
    buffer: &TextBuffer,
    extent: ScreenExtent,
    config: &EditorConfig,
) -> io::Result<()> {
    let cols = usize::from(extent.cols);

    for y in 0..extent.rows {
        match buffer.row(usize::from(y)) {
            Some(row) => {
                let text = row.as_bytes();
                out.append(&text[..text.len().min(cols)]);
            }
            None if buffer.is_empty() && y == banner_row(extent) => {
                draw_banner(out, config, cols);
            }
            None => out.append(&[config.filler]),
        }

        ansi::erase_line(out)?;
        if y + 1 < extent.rows {
            out.append(b"\r\n");
        }
    }

    Ok(())
}

/// Center the banner, truncated to the screen width. The filler glyph
/// takes the first padding column so the left edge stays consistent.
fn draw_banner(out: &mut OutputBuffer, config: &EditorConfig, cols: usize) {
    let banner = config.banner.as_bytes();
    let len = banner.len().min(cols);

    let mut padding = (cols - len) / 2;
    if padding > 0 {
        out.append(&[config.filler]);
        padding -= 1;
    }
    out.append_repeated(b' ', padding);
    out.append(&banner[..len]);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
