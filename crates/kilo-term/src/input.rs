// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical keys. The terminal in raw mode hands
// us single bytes for ordinary keys and short VT100 escape sequences for
// navigation keys:
//
//   ESC [ A/B/C/D        arrows
//   ESC [ H / ESC [ F    Home / End (xterm)
//   ESC O H / ESC O F    Home / End (SS3 variant)
//   ESC [ <digit> ~      Home/Delete/End/PageUp/PageDown (vt220)
//
// # Design
//
// This is a small lookahead, not a general CSI parser. After an ESC we
// read at most three more bytes, each subject to the raw-mode read
// timeout. A timeout before the sequence is complete means the user
// pressed Escape on its own: a terminal sends its sequences back to back,
// a human does not. Anything we don't recognise collapses to `Escape`
// rather than an error.

use std::io;

use crate::error::TermError;

/// The escape byte that starts every terminal sequence.
pub const ESC: u8 = 0x1B;

// ─── Keys ───────────────────────────────────────────────────────────────────

/// A decoded keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    /// Any byte that is neither ESC nor a C0 control code.
    Printable(u8),
    /// Ctrl+letter: the letter with its upper three bits cleared.
    ///
    /// Ctrl+Q arrives as `0x11`. Build one with [`LogicalKey::ctrl`].
    ControlChord(u8),
    /// A standalone Escape press, or an escape sequence we don't know.
    Escape,
    // ── Navigation ──────────────────────────────────────────────
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
}

impl LogicalKey {
    /// The control chord for `letter` (`ctrl(b'q')` is Ctrl+Q).
    #[inline]
    #[must_use]
    pub const fn ctrl(letter: u8) -> Self {
        Self::ControlChord(letter & 0x1F)
    }

    /// Classify a single byte read outside an escape sequence.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            ESC => Self::Escape,
            0x00..=0x1F => Self::ControlChord(byte),
            _ => Self::Printable(byte),
        }
    }

    /// The canonical bytes a terminal sends for this key.
    ///
    /// Home and End use the xterm `ESC [ H` / `ESC [ F` forms; the other
    /// editing keys use the vt220 `ESC [ n ~` form.
    #[must_use]
    pub fn encode(self) -> Vec<u8> {
        match self {
            Self::Printable(b) | Self::ControlChord(b) => vec![b],
            Self::Escape => vec![ESC],
            Self::ArrowUp => b"\x1b[A".to_vec(),
            Self::ArrowDown => b"\x1b[B".to_vec(),
            Self::ArrowRight => b"\x1b[C".to_vec(),
            Self::ArrowLeft => b"\x1b[D".to_vec(),
            Self::Home => b"\x1b[H".to_vec(),
            Self::End => b"\x1b[F".to_vec(),
            Self::Delete => b"\x1b[3~".to_vec(),
            Self::PageUp => b"\x1b[5~".to_vec(),
            Self::PageDown => b"\x1b[6~".to_vec(),
        }
    }
}

// ─── Byte sources ───────────────────────────────────────────────────────────

/// Something that yields terminal bytes one at a time.
///
/// `Ok(None)` means the read timed out with nothing available. It is not
/// an error and not end-of-input: the caller decides whether to wait again.
pub trait ByteSource {
    /// Read one byte, or `None` after the read timeout.
    ///
    /// # Errors
    ///
    /// Any genuine I/O failure from the underlying device.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

/// A finished byte slice. Exhaustion reads as a timeout.
struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl ByteSource for SliceSource<'_> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let Some((&first, rest)) = self.bytes.split_first() else {
            return Ok(None);
        };
        self.bytes = rest;
        Ok(Some(first))
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Blocking key decoder over a [`ByteSource`].
pub struct Decoder<S> {
    source: S,
}

impl<S: ByteSource> Decoder<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying source, e.g. to write a query to a TTY.
    #[inline]
    pub const fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Wait for the next key.
    ///
    /// Timed-out reads before the first byte are retried. Once an ESC has
    /// been seen, a timeout ends the sequence instead.
    ///
    /// # Errors
    ///
    /// [`TermError::Read`] if the source fails for any reason other than a
    /// timeout.
    pub fn next_key(&mut self) -> Result<LogicalKey, TermError> {
        let byte = loop {
            if let Some(b) = self.read()? {
                break b;
            }
        };

        if byte == ESC {
            self.escape_sequence()
        } else {
            Ok(LogicalKey::from_byte(byte))
        }
    }

    fn read(&mut self) -> Result<Option<u8>, TermError> {
        self.source.read_byte().map_err(TermError::Read)
    }

    /// Decode what follows an ESC. Consumes at most three bytes.
    fn escape_sequence(&mut self) -> Result<LogicalKey, TermError> {
        let Some(first) = self.read()? else {
            return Ok(LogicalKey::Escape);
        };
        let Some(second) = self.read()? else {
            return Ok(LogicalKey::Escape);
        };

        let key = match (first, second) {
            (b'[', digit @ b'0'..=b'9') => match self.read()? {
                Some(b'~') => tilde_key(digit),
                _ => LogicalKey::Escape,
            },
            (b'[', letter) => csi_key(letter),
            (b'O', letter) => ss3_key(letter),
            _ => LogicalKey::Escape,
        };

        Ok(key)
    }
}

/// Decode one key from a complete byte slice.
///
/// Returns `None` for an empty slice. Bytes after the first key are
/// ignored.
#[must_use]
pub fn decode(bytes: &[u8]) -> Option<LogicalKey> {
    if bytes.is_empty() {
        return None;
    }
    Decoder::new(SliceSource { bytes }).next_key().ok()
}

// ─── Sequence tables ────────────────────────────────────────────────────────

/// `ESC [ <digit> ~`
const fn tilde_key(digit: u8) -> LogicalKey {
    match digit {
        b'1' | b'7' => LogicalKey::Home,
        b'3' => LogicalKey::Delete,
        b'4' | b'8' => LogicalKey::End,
        b'5' => LogicalKey::PageUp,
        b'6' => LogicalKey::PageDown,
        _ => LogicalKey::Escape,
    }
}

/// `ESC [ <letter>`
const fn csi_key(letter: u8) -> LogicalKey {
    match letter {
        b'A' => LogicalKey::ArrowUp,
        b'B' => LogicalKey::ArrowDown,
        b'C' => LogicalKey::ArrowRight,
        b'D' => LogicalKey::ArrowLeft,
        b'H' => LogicalKey::Home,
        b'F' => LogicalKey::End,
        _ => LogicalKey::Escape,
    }
}

/// `ESC O <letter>`
const fn ss3_key(letter: u8) -> LogicalKey {
    match letter {
        b'H' => LogicalKey::Home,
        b'F' => LogicalKey::End,
        _ => LogicalKey::Escape,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    /// Scripted reads: `Some(b)` is a byte, `None` a timeout. Running off
    /// the end is an error so a broken test fails instead of spinning.
    struct Script {
        reads: VecDeque<io::Result<Option<u8>>>,
    }

    impl Script {
        fn new(reads: &[Option<u8>]) -> Self {
            Self {
                reads: reads.iter().copied().map(Ok).collect(),
            }
        }

        fn bytes(bytes: &[u8]) -> Self {
            Self {
                reads: bytes.iter().map(|&b| Ok(Some(b))).collect(),
            }
        }

        fn remaining(&self) -> usize {
            self.reads.len()
        }
    }

    impl ByteSource for Script {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            self.reads
                .pop_front()
                .unwrap_or_else(|| Err(io::ErrorKind::UnexpectedEof.into()))
        }
    }

    fn key(bytes: &[u8]) -> LogicalKey {
        decode(bytes).unwrap()
    }

    // ── Single bytes ────────────────────────────────────────────────

    #[test]
    fn printable_ascii() {
        assert_eq!(key(b"a"), LogicalKey::Printable(b'a'));
        assert_eq!(key(b"~"), LogicalKey::Printable(b'~'));
        assert_eq!(key(b" "), LogicalKey::Printable(b' '));
    }

    #[test]
    fn high_bytes_are_printable() {
        assert_eq!(key(&[0x7F]), LogicalKey::Printable(0x7F));
        assert_eq!(key(&[0xC3]), LogicalKey::Printable(0xC3));
    }

    #[test]
    fn ctrl_q() {
        assert_eq!(key(&[0x11]), LogicalKey::ctrl(b'q'));
        assert_eq!(LogicalKey::ctrl(b'q'), LogicalKey::ControlChord(0x11));
    }

    #[test]
    fn ctrl_ignores_case() {
        assert_eq!(LogicalKey::ctrl(b'Q'), LogicalKey::ctrl(b'q'));
    }

    #[test]
    fn control_bytes_are_chords() {
        assert_eq!(key(b"\r"), LogicalKey::ControlChord(b'\r'));
        assert_eq!(key(&[0x00]), LogicalKey::ControlChord(0));
    }

    #[test]
    fn empty_slice_decodes_nothing() {
        assert_eq!(decode(b""), None);
    }

    // ── Escape sequences ───────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(key(b"\x1b[A"), LogicalKey::ArrowUp);
        assert_eq!(key(b"\x1b[B"), LogicalKey::ArrowDown);
        assert_eq!(key(b"\x1b[C"), LogicalKey::ArrowRight);
        assert_eq!(key(b"\x1b[D"), LogicalKey::ArrowLeft);
    }

    #[test]
    fn xterm_home_end() {
        assert_eq!(key(b"\x1b[H"), LogicalKey::Home);
        assert_eq!(key(b"\x1b[F"), LogicalKey::End);
    }

    #[test]
    fn ss3_home_end() {
        assert_eq!(key(b"\x1bOH"), LogicalKey::Home);
        assert_eq!(key(b"\x1bOF"), LogicalKey::End);
    }

    #[test]
    fn ss3_unknown_is_escape() {
        assert_eq!(key(b"\x1bOP"), LogicalKey::Escape);
    }

    #[test]
    fn delete() {
        assert_eq!(key(b"\x1b[3~"), LogicalKey::Delete);
    }

    #[test]
    fn tilde_table() {
        let table = [
            (b'1', LogicalKey::Home),
            (b'3', LogicalKey::Delete),
            (b'4', LogicalKey::End),
            (b'5', LogicalKey::PageUp),
            (b'6', LogicalKey::PageDown),
            (b'7', LogicalKey::Home),
            (b'8', LogicalKey::End),
        ];
        for (digit, expected) in table {
            assert_eq!(key(&[ESC, b'[', digit, b'~']), expected, "digit {}", digit as char);
        }
    }

    #[test]
    fn unmapped_digits_are_escape() {
        for digit in [b'0', b'2', b'9'] {
            assert_eq!(key(&[ESC, b'[', digit, b'~']), LogicalKey::Escape);
        }
    }

    #[test]
    fn digit_without_tilde_is_escape() {
        assert_eq!(key(b"\x1b[3x"), LogicalKey::Escape);
    }

    #[test]
    fn unknown_csi_letter_is_escape() {
        assert_eq!(key(b"\x1b[Z"), LogicalKey::Escape);
    }

    #[test]
    fn alt_letter_is_escape() {
        assert_eq!(key(b"\x1bab"), LogicalKey::Escape);
    }

    // ── Timeouts ───────────────────────────────────────────────────

    #[test]
    fn lone_escape_after_timeout() {
        assert_eq!(key(b"\x1b"), LogicalKey::Escape);
    }

    #[test]
    fn escape_bracket_then_timeout() {
        assert_eq!(key(b"\x1b["), LogicalKey::Escape);
    }

    #[test]
    fn escape_bracket_digit_then_timeout() {
        assert_eq!(key(b"\x1b[3"), LogicalKey::Escape);
    }

    #[test]
    fn timeouts_before_first_byte_are_retried() {
        let mut decoder = Decoder::new(Script::new(&[None, None, None, Some(b'x')]));
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Printable(b'x'));
    }

    #[test]
    fn timeout_mid_sequence_does_not_consume_more() {
        let mut decoder = Decoder::new(Script::new(&[Some(ESC), None, Some(b'a')]));
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Escape);
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Printable(b'a'));
    }

    #[test]
    fn sequence_consumes_exactly_its_bytes() {
        let mut decoder = Decoder::new(Script::bytes(b"\x1b[5~\x1b[Dq"));
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::PageUp);
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::ArrowLeft);
        assert_eq!(decoder.source_mut().remaining(), 1);
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Printable(b'q'));
    }

    #[test]
    fn unknown_sequence_swallows_lookahead() {
        // ESC [ 9 x is unknown: all four bytes go, the next key is clean.
        let mut decoder = Decoder::new(Script::bytes(b"\x1b[9xa"));
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Escape);
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::Printable(b'a'));
    }

    // ── Errors ─────────────────────────────────────────────────────

    #[test]
    fn read_error_is_fatal() {
        let mut decoder = Decoder::new(Script {
            reads: VecDeque::from([Err(io::Error::from_raw_os_error(libc::EIO))]),
        });
        let err = decoder.next_key().unwrap_err();
        assert!(matches!(err, TermError::Read(_)));
        assert!(err.to_string().starts_with("read: "));
    }

    #[test]
    fn read_error_mid_sequence_is_fatal() {
        let mut decoder = Decoder::new(Script {
            reads: VecDeque::from([Ok(Some(ESC)), Err(io::ErrorKind::BrokenPipe.into())]),
        });
        assert!(decoder.next_key().is_err());
    }

    #[test]
    fn decoder_over_mut_reference() {
        let mut script = Script::bytes(b"\x1b[B");
        let mut decoder = Decoder::new(&mut script);
        assert_eq!(decoder.next_key().unwrap(), LogicalKey::ArrowDown);
        assert_eq!(script.remaining(), 0);
    }

    // ── Encoding ───────────────────────────────────────────────────

    #[test]
    fn encode_delete() {
        assert_eq!(LogicalKey::Delete.encode(), b"\x1b[3~");
    }

    #[test]
    fn encode_ctrl_q() {
        assert_eq!(LogicalKey::ctrl(b'q').encode(), vec![0x11]);
    }

    fn any_key() -> impl Strategy<Value = LogicalKey> {
        prop_oneof![
            any::<u8>()
                .prop_filter("ESC is not printable", |b| *b >= 0x20 && *b != ESC)
                .prop_map(LogicalKey::Printable),
            (0u8..0x20)
                .prop_filter("ESC is not a chord", |b| *b != ESC)
                .prop_map(LogicalKey::ControlChord),
            Just(LogicalKey::Escape),
            Just(LogicalKey::ArrowUp),
            Just(LogicalKey::ArrowDown),
            Just(LogicalKey::ArrowLeft),
            Just(LogicalKey::ArrowRight),
            Just(LogicalKey::Delete),
            Just(LogicalKey::Home),
            Just(LogicalKey::End),
            Just(LogicalKey::PageUp),
            Just(LogicalKey::PageDown),
        ]
    }

    proptest! {
        #[test]
        fn encode_then_decode_is_identity(k in any_key()) {
            prop_assert_eq!(key(&k.encode()), k);
        }

        #[test]
        fn tilde_decode_is_stable(digit in prop::sample::select(vec![b'1', b'3', b'4', b'5', b'6', b'7', b'8'])) {
            let first = key(&[ESC, b'[', digit, b'~']);
            prop_assert_eq!(key(&first.encode()), first);
        }

        #[test]
        fn any_input_decodes_without_error(bytes in prop::collection::vec(any::<u8>(), 1..8)) {
            prop_assert!(decode(&bytes).is_some());
        }
    }
}
