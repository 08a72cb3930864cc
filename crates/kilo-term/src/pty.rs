// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Pseudo-terminal pair for tests that need a real terminal device.
//
// `cargo test` usually runs with stdin detached from any terminal, so tests
// that exercise termios or TIOCGWINSZ open their own pty instead. When the
// environment has no /dev/ptmx (some sandboxes), `Pty::open` returns `None`
// and the test returns early.

use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

pub struct Pty {
    master: OwnedFd,
    slave: OwnedFd,
}

impl Pty {
    pub fn open() -> Option<Self> {
        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            if master < 0 {
                return None;
            }
            let master = OwnedFd::from_raw_fd(master);

            if libc::grantpt(master.as_raw_fd()) != 0 || libc::unlockpt(master.as_raw_fd()) != 0 {
                return None;
            }

            let mut name = [0 as libc::c_char; 128];
            if libc::ptsname_r(master.as_raw_fd(), name.as_mut_ptr(), name.len()) != 0 {
                return None;
            }

            let slave = libc::open(name.as_ptr(), libc::O_RDWR | libc::O_NOCTTY);
            if slave < 0 {
                return None;
            }

            Some(Self {
                master,
                slave: OwnedFd::from_raw_fd(slave),
            })
        }
    }

    pub fn master(&self) -> RawFd {
        self.master.as_raw_fd()
    }

    pub fn slave(&self) -> RawFd {
        self.slave.as_raw_fd()
    }

    /// Set the window size the slave side reports.
    pub fn set_size(&self, rows: u16, cols: u16) -> bool {
        let ws = libc::winsize {
            ws_row: rows,
            ws_col: cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        unsafe { libc::ioctl(self.master(), libc::TIOCSWINSZ, &raw const ws) == 0 }
    }
}
