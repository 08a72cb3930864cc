//! Editor error type.
//!
//! File errors carry the path so the message printed after the terminal is
//! restored says which file, which operation, and the OS error code.

use std::io;
use std::path::PathBuf;

use kilo_term::TermError;
use thiserror::Error;

/// A fatal editor failure.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The file named on the command line could not be opened.
    #[error("open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a line from an opened file failed.
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A terminal operation failed.
    #[error(transparent)]
    Term(#[from] TermError),
}
