// SPDX-License-Identifier: MIT
//
// Terminal error type.
//
// Every variant names the terminal operation that failed. The wrapped
// `io::Error` carries the OS error code, so the message printed after the
// terminal is restored reads like `tcsetattr: Input/output error (os error 5)`.

use std::io;

use thiserror::Error;

/// A fatal failure while talking to the terminal device.
#[derive(Debug, Error)]
pub enum TermError {
    /// Capturing the original terminal configuration failed.
    #[error("tcgetattr: {0}")]
    GetAttr(#[source] io::Error),

    /// Installing or restoring a terminal configuration failed.
    #[error("tcsetattr: {0}")]
    SetAttr(#[source] io::Error),

    /// Reading from the terminal failed for a reason other than a timeout.
    #[error("read: {0}")]
    Read(#[source] io::Error),

    /// Writing to the terminal failed.
    #[error("write: {0}")]
    Write(#[source] io::Error),

    /// Neither the window-size ioctl nor the cursor probe produced a size.
    #[error("getWindowSize: unable to determine terminal size")]
    WindowSize,

    /// The cursor-position report was missing or malformed.
    #[error("cursor position report: {0}")]
    CursorReport(String),
}
