// SPDX-License-Identifier: MIT
//
// kilo-term — Terminal control for kilo.
//
// Everything that touches the terminal device lives here: raw mode with
// guaranteed restore, screen geometry with a probe fallback, a small
// VT100 key decoder, ANSI sequence writers, and the output buffer that
// sends each frame in a single write.
//
// No TUI framework in between. The display needs a dozen escape sequences
// and one termios change, and every one of them is visible in this crate.

#[cfg(not(unix))]
compile_error!("kilo-term drives a POSIX terminal and only builds on Unix");

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod input;
pub mod output;
pub mod terminal;
pub mod tty;

#[cfg(all(test, target_os = "linux"))]
mod pty;

pub use error::TermError;
