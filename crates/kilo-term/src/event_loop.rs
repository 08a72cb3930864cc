// SPDX-License-Identifier: MIT
//
// Event loop — the heartbeat of the display.
//
// One iteration: paint a frame into the output buffer, write it with a
// single write, wait for the next key, hand it to the application. The
// wait is the raw-mode read timeout, so an idle loop sleeps in the kernel
// rather than spinning.
//
// The loop owns no terminal state. Raw mode is the caller's guard, and the
// byte source and writer are parameters, so the same loop drives a real
// TTY and a scripted test.

use std::io::{self, Write};

use crate::ansi;
use crate::error::TermError;
use crate::input::{ByteSource, Decoder, LogicalKey};
use crate::output::OutputBuffer;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
pub trait App {
    /// Handle one decoded key. Return [`Action::Quit`] to exit the loop.
    fn on_key(&mut self, key: LogicalKey) -> Action;

    /// Compose the current state into `out`. The buffer is empty on entry
    /// and is written to the terminal in one piece afterwards.
    ///
    /// # Errors
    ///
    /// Whatever the writes into `out` report. [`OutputBuffer`] itself
    /// never fails, so in practice this is `Ok`.
    fn paint(&self, out: &mut OutputBuffer) -> io::Result<()>;
}

// ─── Loop ────────────────────────────────────────────────────────────────────

/// Run until the application returns [`Action::Quit`].
///
/// On quit the screen is cleared and the cursor homed, so the shell prompt
/// comes back on a clean screen.
///
/// # Errors
///
/// [`TermError::Read`] if decoding hits a genuine read failure,
/// [`TermError::Write`] if a frame can't be written.
pub fn run<S, W>(
    app: &mut impl App,
    decoder: &mut Decoder<S>,
    out: &mut W,
) -> Result<(), TermError>
where
    S: ByteSource,
    W: Write,
{
    let mut frame = OutputBuffer::new();
    let mut frames: u64 = 0;

    loop {
        app.paint(&mut frame)
            .and_then(|()| frame.flush_to(out))
            .map_err(TermError::Write)?;
        frames += 1;

        let key = decoder.next_key()?;
        tracing::trace!(?key, "key");

        if app.on_key(key) == Action::Quit {
            tracing::debug!(frames, "quit");
            return clear(out);
        }
    }
}

/// Clear the screen and home the cursor.
///
/// # Errors
///
/// [`TermError::Write`] if the terminal can't be written.
pub fn clear(out: &mut impl Write) -> Result<(), TermError> {
    let mut buf = OutputBuffer::new();
    ansi::clear_screen(&mut buf)
        .and_then(|()| ansi::cursor_home(&mut buf))
        .and_then(|()| buf.flush_to(out))
        .map_err(TermError::Write)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
