//! Editor configuration.
//!
//! Values the display needs that aren't derived from the terminal or the
//! file. The binary builds one from its command-line arguments; tests use
//! [`EditorConfig::default`].

use kilo_term::input::LogicalKey;

/// Version shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Text centered on an empty screen, a third of the way down.
    pub banner: String,

    /// Glyph drawn at the start of screen rows past the end of the file.
    pub filler: u8,

    /// The key that ends the session.
    pub quit_key: LogicalKey,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            banner: format!("Kilo editor -- version {VERSION}"),
            filler: b'~',
            quit_key: LogicalKey::ctrl(b'q'),
        }
    }
}
