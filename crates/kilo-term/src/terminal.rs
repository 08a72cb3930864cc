// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and isatty. These are the standard POSIX interfaces for
// terminal control — there is no safe alternative. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// The terminal's line discipline is process-wide state shared with the
// shell that launched us. `RawMode` captures the original configuration,
// installs the raw one, and owns the snapshot until it is put back. The
// guard restores on `restore()` or on drop, whichever comes first, and
// never twice. Because the guard is a plain value, every exit route out of
// the scope that holds it (quit key, `?` on a fatal error, a panic that
// unwinds) passes through the same restore.

use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::error::TermError;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Raw-mode tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawModeConfig {
    /// How long a `read()` waits for the first byte before returning empty.
    ///
    /// Rounded to the terminal's tenths-of-a-second `VTIME` unit and clamped
    /// to `0.1s..=25.5s`. Default: 100ms.
    pub read_timeout: Duration,
}

impl RawModeConfig {
    /// The read timeout expressed as a `VTIME` value (deciseconds).
    #[must_use]
    pub fn vtime(&self) -> u8 {
        let tenths = self.read_timeout.as_millis().div_ceil(100);
        u8::try_from(tenths.clamp(1, 255)).unwrap_or(u8::MAX)
    }
}

impl Default for RawModeConfig {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(100),
        }
    }
}

// ─── Queries ────────────────────────────────────────────────────────────────

/// Check whether `fd` is connected to a terminal.
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

/// Read the current termios of `fd`.
fn get_attr(fd: RawFd) -> Result<libc::termios, TermError> {
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
        return Err(TermError::GetAttr(io::Error::last_os_error()));
    }
    Ok(termios)
}

/// Apply `termios` to `fd`, discarding unread input first.
fn set_attr(fd: RawFd, termios: &libc::termios) -> Result<(), TermError> {
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) } != 0 {
        return Err(TermError::SetAttr(io::Error::last_os_error()));
    }
    Ok(())
}

// ─── Flag transformation ───────────────────────────────────────────────────

/// Derive the raw configuration from an original one.
///
/// Input:  no break signal, no CR→NL, no parity check, no 8th-bit strip,
///         no Ctrl-S/Ctrl-Q flow control.
/// Output: no post-processing (`\n` is not expanded to `\r\n`).
/// Local:  no echo, no canonical line buffering, no Ctrl-V, no signals
///         from Ctrl-C/Ctrl-Z.
/// Control: 8-bit characters.
///
/// `VMIN = 0` and `VTIME = vtime` make `read()` return as soon as any byte
/// is available, or empty-handed after `vtime` tenths of a second.
#[must_use]
pub fn make_raw(mut termios: libc::termios, vtime: u8) -> libc::termios {
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = vtime;
    termios
}

// ─── RawMode guard ──────────────────────────────────────────────────────────

/// Exclusive raw-mode control of a terminal, restored exactly once.
///
/// # Example
///
/// ```no_run
/// use std::os::unix::io::AsRawFd;
/// use kilo_term::terminal::{RawMode, RawModeConfig};
///
/// let fd = std::io::stdin().as_raw_fd();
/// let mut raw = RawMode::enable(fd, &RawModeConfig::default())?;
/// // ... read keys, draw frames ...
/// raw.restore()?;
/// # Ok::<(), kilo_term::TermError>(())
/// ```
pub struct RawMode {
    fd: RawFd,

    /// The configuration captured before raw mode was installed. `None`
    /// once it has been put back.
    original: Option<libc::termios>,
}

impl RawMode {
    /// Capture the terminal's configuration on `fd` and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// [`TermError::GetAttr`] if the configuration cannot be read (e.g. `fd`
    /// is not a terminal), [`TermError::SetAttr`] if the raw configuration
    /// cannot be applied. In the latter case nothing was changed.
    pub fn enable(fd: RawFd, config: &RawModeConfig) -> Result<Self, TermError> {
        let original = get_attr(fd)?;
        set_attr(fd, &make_raw(original, config.vtime()))?;

        tracing::debug!(fd, vtime = config.vtime(), "raw mode enabled");

        Ok(Self {
            fd,
            original: Some(original),
        })
    }

    /// Whether the raw configuration is still installed.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.original.is_some()
    }

    /// Put the original configuration back.
    ///
    /// Idempotent: once restored, further calls (and the drop) do nothing.
    ///
    /// # Errors
    ///
    /// [`TermError::SetAttr`] if the terminal rejects the original
    /// configuration. The snapshot is kept so the drop retries once.
    pub fn restore(&mut self) -> Result<(), TermError> {
        if let Some(ref original) = self.original {
            set_attr(self.fd, original)?;
            self.original = None;
            tracing::debug!(fd = self.fd, "raw mode restored");
        }
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::error!(error = %e, "failed to restore terminal mode");
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
