//! # loginsight - large log file viewer
//!
//! loginsight opens files of any size in a terminal viewer without loading
//! them into memory. A single scan at open time records where every line
//! starts and how long it is; after that, any run of lines is served with one
//! positioned read.
//!
//! ## Architecture
//!
//! - [`file`] - Line index, range reads and the optional range cache
//! - [`error`] - Error type shared by the library
//! - [`output`] - Printing line ranges to stdout
//! - [`tui`] - Interactive terminal viewer (feature `interactive`)
//! - [`utils`] - Decoding, config, logging and progress helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use loginsight::File;
//!
//! let file = File::open("/var/log/app.log")?;
//! let size = file.size();
//! println!(
//!     "{} lines, longest is {} characters",
//!     size.number_of_lines, size.size_of_longest_line.in_characters
//! );
//!
//! match file.load_lines(1_000, 40) {
//!     Ok(lines) => lines.iter().for_each(|l| println!("{}", l)),
//!     Err(e) if e.is_out_of_range() => println!("past the end"),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), loginsight::Error>(())
//! ```
//!
//! ## Text handling
//!
//! Bytes are decoded as UTF-8 and invalid sequences become U+FFFD, so binary
//! or truncated content never fails to load. Tabs are expanded to a fixed stop
//! of four columns, and line widths are measured in characters after that
//! expansion.

pub mod error;
pub mod file;
pub mod output;
#[cfg(feature = "interactive")]
pub mod tui;
pub mod utils;

pub use error::{Error, Result};
pub use file::{File, FileIndex, FileSize, LineDescriptor, LineSize};
