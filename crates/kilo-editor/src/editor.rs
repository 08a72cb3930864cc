//! Editor state — everything one session owns.
//!
//! `Editor` holds the buffer, the cursor, the screen size, and the
//! configuration as plain fields. There is no global editor state: the
//! binary builds one `Editor` and hands it to the event loop by `&mut`.

use std::io;
use std::path::Path;

use kilo_term::event_loop::{Action, App};
use kilo_term::geometry::ScreenExtent;
use kilo_term::input::LogicalKey;
use kilo_term::output::OutputBuffer;

use crate::buffer::TextBuffer;
use crate::compositor::compose_frame;
use crate::config::EditorConfig;
use crate::cursor::Cursor;
use crate::error::EditorError;

/// A display session.
#[derive(Debug, Clone)]
pub struct Editor {
    buffer: TextBuffer,
    cursor: Cursor,
    extent: ScreenExtent,
    config: EditorConfig,
}

impl Editor {
    /// A session with no file: the screen shows the welcome banner.
    #[must_use]
    pub const fn new(extent: ScreenExtent, config: EditorConfig) -> Self {
        Self::with_buffer(TextBuffer::new(), extent, config)
    }

    /// A session over an already-loaded buffer.
    #[must_use]
    pub const fn with_buffer(buffer: TextBuffer, extent: ScreenExtent, config: EditorConfig) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            extent,
            config,
        }
    }

    /// A session over the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`TextBuffer::load_file`].
    pub fn open(path: &Path, extent: ScreenExtent, config: EditorConfig) -> Result<Self, EditorError> {
        Ok(Self::with_buffer(TextBuffer::load_file(path)?, extent, config))
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn extent(&self) -> ScreenExtent {
        self.extent
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    // -- Input --------------------------------------------------------------

    /// Apply one key. The quit key ends the session; navigation keys move
    /// the cursor; everything else is ignored.
    pub fn process_key(&mut self, key: LogicalKey) -> Action {
        if key == self.config.quit_key {
            return Action::Quit;
        }
        self.cursor.move_by(key, self.extent);
        Action::Continue
    }
}

impl App for Editor {
    fn on_key(&mut self, key: LogicalKey) -> Action {
        self.process_key(key)
    }

    fn paint(&self, out: &mut OutputBuffer) -> io::Result<()> {
        compose_frame(out, &self.buffer, self.cursor, self.extent, &self.config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kilo_term::TermError;
    use kilo_term::event_loop;
    use kilo_term::input::{ByteSource, Decoder};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::io::Write;

    const SCREEN: ScreenExtent = ScreenExtent { rows: 24, cols: 80 };

    /// Typed keys; running out is a read failure.
    struct Typed(VecDeque<u8>);

    impl ByteSource for Typed {
        fn read_byte(&mut self) -> io::Result<Option<u8>> {
            self.0
                .pop_front()
                .map(Some)
                .ok_or_else(|| io::ErrorKind::UnexpectedEof.into())
        }
    }

    fn run(editor: &mut Editor, input: &[u8]) -> (Result<(), TermError>, Vec<u8>) {
        let mut decoder = Decoder::new(Typed(input.iter().copied().collect()));
        let mut out = Vec::new();
        let result = event_loop::run(editor, &mut decoder, &mut out);
        (result, out)
    }

    #[test]
    fn ctrl_q_quits() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        assert_eq!(editor.process_key(LogicalKey::ctrl(b'q')), Action::Quit);
    }

    #[test]
    fn plain_q_does_not_quit() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        assert_eq!(editor.process_key(LogicalKey::Printable(b'q')), Action::Continue);
    }

    #[test]
    fn configured_quit_key() {
        let config = EditorConfig {
            quit_key: LogicalKey::Escape,
            ..EditorConfig::default()
        };
        let mut editor = Editor::new(SCREEN, config);
        assert_eq!(editor.process_key(LogicalKey::ctrl(b'q')), Action::Continue);
        assert_eq!(editor.process_key(LogicalKey::Escape), Action::Quit);
    }

    #[test]
    fn arrows_move_cursor() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        editor.process_key(LogicalKey::ArrowDown);
        editor.process_key(LogicalKey::ArrowDown);
        editor.process_key(LogicalKey::ArrowRight);
        assert_eq!((editor.cursor().x(), editor.cursor().y()), (1, 2));
    }

    #[test]
    fn inert_keys_change_nothing() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        for key in [LogicalKey::Printable(b'x'), LogicalKey::Delete, LogicalKey::Escape] {
            assert_eq!(editor.process_key(key), Action::Continue);
        }
        assert_eq!(editor.cursor(), Cursor::new());
        assert!(editor.buffer().is_empty());
    }

    // -- Through the event loop ---------------------------------------------

    #[test]
    fn arrow_up_at_top_then_quit() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        let (result, out) = run(&mut editor, b"\x1b[A\x11");

        assert!(result.is_ok());
        assert_eq!(editor.cursor().y(), 0);
        assert!(out.ends_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn delete_sequence_is_inert() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        let (result, _) = run(&mut editor, b"\x1b[3~\x11");
        assert!(result.is_ok());
        assert_eq!(editor.cursor(), Cursor::new());
    }

    #[test]
    fn one_frame_per_key() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        let (result, out) = run(&mut editor, b"\x1b[B\x1b[C\x11");
        assert!(result.is_ok());

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("\x1b[?25l").count(), 3);
        assert!(out.contains("\x1b[2;2H\x1b[?25h\x1b[2J"));
    }

    #[test]
    fn first_frame_shows_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a\nbb\r\nccc\n").unwrap();

        let mut editor = Editor::open(file.path(), SCREEN, EditorConfig::default()).unwrap();
        assert_eq!(editor.buffer().row_count(), 3);

        let (result, out) = run(&mut editor, b"\x11");
        assert!(result.is_ok());
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("\x1b[?25l\x1b[Ha\x1b[K\r\nbb\x1b[K\r\nccc\x1b[K\r\n~"));
        assert!(!out.contains("Kilo editor"));
    }

    #[test]
    fn read_failure_propagates() {
        let mut editor = Editor::new(SCREEN, EditorConfig::default());
        let (result, _) = run(&mut editor, b"\x1b[B");
        assert!(matches!(result, Err(TermError::Read(_))));
        assert_eq!(editor.cursor().y(), 1);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Editor::open(&dir.path().join("nope"), SCREEN, EditorConfig::default()).unwrap_err();
        assert!(matches!(err, EditorError::Open { .. }));
    }
}
