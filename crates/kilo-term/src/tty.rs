// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// The terminal device — raw reads from stdin, raw writes to stdout.
//
// Reads go straight to `read(2)` so the raw-mode timeout (VMIN=0, VTIME=n)
// is visible to us: a zero-byte read is "nothing yet", not end-of-file.
// Rust's `Stdin` would hide that behind its own buffering.
//
// Writes go straight to `write(2)` as well. `Stdout` is line-buffered and
// would split a frame at its last newline, which is exactly the partial
// update the single-write frame exists to avoid.

use std::io::{self, Write};
use std::os::unix::io::RawFd;

use crate::input::ByteSource;

/// Handle to the controlling terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tty {
    input: RawFd,
    output: RawFd,
}

impl Tty {
    /// The process's stdin/stdout pair.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            input: libc::STDIN_FILENO,
            output: libc::STDOUT_FILENO,
        }
    }

    /// A terminal reached through explicit descriptors.
    #[must_use]
    pub const fn from_fds(input: RawFd, output: RawFd) -> Self {
        Self { input, output }
    }

    /// The descriptor raw mode and the window-size ioctl are applied to.
    #[inline]
    #[must_use]
    pub const fn input_fd(&self) -> RawFd {
        self.input
    }

    #[inline]
    #[must_use]
    pub const fn output_fd(&self) -> RawFd {
        self.output
    }
}

impl ByteSource for Tty {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(self.input, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    // Cygwin reports the VTIME expiry as EAGAIN.
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

impl Write for Tty {
    /// One `write(2)` call per invocation.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.output, buf.as_ptr().cast(), buf.len()) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }
        #[allow(clippy::cast_sign_loss)] // n >= 0 checked above.
        Ok(n as usize)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
