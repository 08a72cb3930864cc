// SPDX-License-Identifier: MIT
//
// Frame output buffering.
//
// OutputBuffer accumulates every byte of a frame (cursor moves, row text,
// erase sequences) in memory so the whole frame reaches the terminal in a
// single write() syscall. A frame written piecemeal lets the terminal paint
// half of it, and the user sees the cursor jump around the screen.
//
// Appends never fail. If the buffer cannot grow, the fragment is dropped
// and the frame goes out degraded; the next frame starts from a cleared
// buffer and has its own chance. A missing row for one frame beats
// aborting the process over it.

use std::io::{self, Write};

/// A byte buffer that accumulates ANSI output for a single `write()` syscall.
///
/// Default capacity: 4 KB — a full 80×24 frame with escapes fits without
/// reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
    /// Fragments discarded since the last flush.
    dropped: usize,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (4 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
            dropped: 0,
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Fragments dropped because the buffer could not grow.
    #[inline]
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Append `bytes`, or drop them whole if the buffer cannot grow.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.buf.try_reserve(bytes.len()).is_err() {
            self.dropped += 1;
            tracing::warn!(len = bytes.len(), "output buffer full, fragment dropped");
            return;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Append `byte` repeated `count` times.
    pub fn append_repeated(&mut self, byte: u8, count: usize) {
        if self.buf.try_reserve(count).is_err() {
            self.dropped += 1;
            tracing::warn!(len = count, "output buffer full, fragment dropped");
            return;
        }
        self.buf.resize(self.buf.len() + count, byte);
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
        self.dropped = 0;
    }

    /// Write the accumulated frame to `w` and clear the buffer.
    ///
    /// The frame goes out as one `write_all`; against a [`Tty`](crate::tty::Tty)
    /// that is a single `write(2)` unless the kernel accepts only part of it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer is cleared
    /// either way.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        let result = if self.buf.is_empty() {
            Ok(())
        } else {
            w.write_all(&self.buf).and_then(|()| w.flush())
        };
        self.clear();
        result
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. Real flushing via flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
