// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Screen geometry — how many rows and columns we get to draw in.
//
// Two strategies:
//
//   1. ioctl(TIOCGWINSZ). Cheap and exact, but not every terminal
//      (or every serial line) answers it, and some answer with zeros.
//
//   2. Push the cursor into the bottom-right corner with clamped moves
//      (`ESC[999C ESC[999B`; the terminal stops at the edge rather than
//      wrapping), then ask where it ended up with a device status report.
//      The reply `ESC[<row>;<col>R` is the screen size.
//
// The probe leaves the physical cursor in the corner. That is harmless:
// every frame starts by homing the cursor.

use std::io::{self, Write};
use std::os::unix::io::RawFd;

use crate::ansi;
use crate::error::TermError;
use crate::input::ByteSource;

/// Response buffer for the cursor-position report. One byte is held back,
/// so at most 31 bytes of reply are read.
const REPORT_BUF_SIZE: usize = 32;

// ─── ScreenExtent ───────────────────────────────────────────────────────────

/// Terminal dimensions in character cells. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenExtent {
    pub rows: u16,
    pub cols: u16,
}

impl ScreenExtent {
    /// `None` if either dimension is zero.
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            Some(Self { rows, cols })
        }
    }
}

// ─── Strategies ─────────────────────────────────────────────────────────────

/// Ask the driver for the window size of `fd`.
///
/// Returns `None` if the ioctl fails or reports a zero dimension.
#[must_use]
pub fn query_winsize(fd: RawFd) -> Option<ScreenExtent> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 {
        ScreenExtent::new(ws.ws_row, ws.ws_col)
    } else {
        None
    }
}

/// Parse the body of a cursor-position report: `ESC [ <row> ; <col>`,
/// without the trailing `R`.
///
/// # Errors
///
/// [`TermError::CursorReport`] if the prefix is wrong, either number is
/// missing or out of range, or either is zero.
pub fn parse_cursor_report(report: &[u8]) -> Result<ScreenExtent, TermError> {
    let bad = |why: &str| TermError::CursorReport(why.to_owned());

    let body = report
        .strip_prefix(b"\x1b[")
        .ok_or_else(|| bad("missing ESC [ prefix"))?;
    let body = std::str::from_utf8(body).map_err(|_| bad("not ASCII"))?;
    let (row, col) = body.split_once(';').ok_or_else(|| bad("missing ';'"))?;

    let rows = row.parse::<u16>().map_err(|_| bad("bad row"))?;
    let cols = col.parse::<u16>().map_err(|_| bad("bad column"))?;

    ScreenExtent::new(rows, cols).ok_or_else(|| bad("zero dimension"))
}

/// Query the cursor position with `ESC[6n` and read the reply.
///
/// Reads until `R`, a read timeout, or the 32-byte buffer is full.
///
/// # Errors
///
/// [`TermError::Write`] / [`TermError::Read`] on device failure,
/// [`TermError::CursorReport`] if the reply doesn't parse.
pub fn cursor_position<D: ByteSource + Write>(dev: &mut D) -> Result<ScreenExtent, TermError> {
    ansi::request_cursor_position(dev)
        .and_then(|()| dev.flush())
        .map_err(TermError::Write)?;

    let mut buf = [0u8; REPORT_BUF_SIZE];
    let mut len = 0;
    while len < REPORT_BUF_SIZE - 1 {
        match dev.read_byte().map_err(TermError::Read)? {
            Some(b'R') | None => break,
            Some(b) => {
                buf[len] = b;
                len += 1;
            }
        }
    }

    parse_cursor_report(&buf[..len])
}

/// The fallback strategy: clamp the cursor to the corner and read it back.
///
/// # Errors
///
/// Same as [`cursor_position`].
pub fn probe_extent<D: ByteSource + Write>(dev: &mut D) -> Result<ScreenExtent, TermError> {
    let mut moves = Vec::with_capacity(12);
    ansi::cursor_forward(&mut moves, 999)
        .and_then(|()| ansi::cursor_down(&mut moves, 999))
        .and_then(|()| dev.write_all(&moves))
        .map_err(TermError::Write)?;

    cursor_position(dev)
}

/// Resolve the screen size: the ioctl on `fd` first, the probe on `dev`
/// if that fails.
///
/// # Errors
///
/// [`TermError::WindowSize`] if both strategies fail.
pub fn resolve_extent<D: ByteSource + Write>(
    fd: RawFd,
    dev: &mut D,
) -> Result<ScreenExtent, TermError> {
    if let Some(extent) = query_winsize(fd) {
        tracing::debug!(rows = extent.rows, cols = extent.cols, "screen size from ioctl");
        return Ok(extent);
    }

    match probe_extent(dev) {
        Ok(extent) => {
            tracing::debug!(rows = extent.rows, cols = extent.cols, "screen size from probe");
            Ok(extent)
        }
        Err(e) => {
            tracing::debug!(error = %e, "screen size probe failed");
            Err(TermError::WindowSize)
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
