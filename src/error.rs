use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the line index and range reads.
///
/// Malformed UTF-8 is never an error: it is replaced with U+FFFD while decoding.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested range extends past the last indexed line.
    #[error("requested {count} lines starting at line {start_line}, but the file has {line_count} lines")]
    OutOfRange {
        start_line: u64,
        count: u64,
        line_count: u64,
    },
}

impl Error {
    /// True when the caller scrolled past the end of the file
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
