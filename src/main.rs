// SPDX-License-Identifier: MIT
//
// kilo — a minimal raw-mode terminal text display.
//
// This is the main binary that wires the two crates together:
//
//   kilo-term   → raw mode, screen size, key decoding, output, event loop
//   kilo-editor → text rows, cursor, compositor, editor state
//
// Startup order matters. The file is loaded before the terminal changes
// mode, so a bad path is reported on a normal terminal. Raw mode is a
// guard: it is restored explicitly on the clean path and by `Drop` on
// every other one, before the error is printed.
//
//   load file → raw mode → screen size → Editor → event loop → restore

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kilo_editor::EditorError;
use kilo_editor::buffer::TextBuffer;
use kilo_editor::config::EditorConfig;
use kilo_editor::editor::Editor;
use kilo_term::event_loop;
use kilo_term::geometry::resolve_extent;
use kilo_term::input::Decoder;
use kilo_term::terminal::{RawMode, RawModeConfig};
use kilo_term::tty::Tty;

/// Filter variable for `--log-file` output, in `EnvFilter` syntax.
const LOG_ENV: &str = "KILO_LOG";

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Show a file in the terminal, or a welcome screen without one.
/// Arrow keys move the cursor; Ctrl-Q quits.
#[derive(Debug, Parser)]
#[command(name = "kilo", version, about)]
struct Args {
    /// File to display.
    file: Option<PathBuf>,

    /// How long a read waits for a key before returning empty, in
    /// milliseconds. Rounded up to tenths of a second.
    #[arg(long, value_name = "MS", default_value_t = 100)]
    read_timeout_ms: u64,

    /// Write diagnostics to this file. The screen belongs to the display,
    /// so nothing is logged without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn raw_mode(&self) -> RawModeConfig {
        RawModeConfig {
            read_timeout: Duration::from_millis(self.read_timeout_ms),
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second subscriber can only come from a test harness; keep the first.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

// ─── Session ────────────────────────────────────────────────────────────────

fn run(args: &Args) -> Result<(), EditorError> {
    let buffer = match &args.file {
        Some(path) => TextBuffer::load_file(path)?,
        None => TextBuffer::new(),
    };

    let mut tty = Tty::stdio();
    let mut raw = RawMode::enable(tty.input_fd(), &args.raw_mode())?;

    let extent = resolve_extent(tty.input_fd(), &mut tty)?;
    tracing::info!(rows = extent.rows, cols = extent.cols, "session start");

    let mut editor = Editor::with_buffer(buffer, extent, EditorConfig::default());
    event_loop::run(&mut editor, &mut Decoder::new(tty), &mut tty)?;

    raw.restore()?;
    tracing::info!("session end");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("kilo: log file {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    // `run` has dropped the raw-mode guard by the time it returns, so the
    // message lands on a cooked terminal.
    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "fatal");
        let _ = event_loop::clear(&mut Tty::stdio());
        eprintln!("kilo: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

// ─── Tests ──────────────────────────────────────────────────────────────────
