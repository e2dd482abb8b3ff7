//! Random access to the lines of a file on disk.
//!
//! [`File::open`] scans the file once and keeps an index of every line's
//! offset and length. [`File::load_lines`] then serves any contiguous range
//! of lines with a single positioned read, so memory stays proportional to
//! the number of lines rather than the size of the file.
//!
//! ```no_run
//! use loginsight::file::File;
//!
//! let file = File::open("/var/log/syslog")?;
//! println!("{} lines", file.line_count());
//!
//! for line in file.load_lines(0, 10)? {
//!     println!("{}", line);
//! }
//! # Ok::<(), loginsight::Error>(())
//! ```

pub mod cache;
pub mod index;
pub mod reader;

pub use cache::RangeCache;
pub use index::{FileIndex, LineDescriptor};
pub use reader::{PositionedFile, ReadAt};

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Longest line of a file in both units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSize {
    pub in_bytes: u64,
    pub in_characters: u64,
}

/// Aggregate size information, all cached at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileSize {
    pub total_size_in_bytes: u64,
    pub number_of_lines: usize,
    pub size_of_longest_line: LineSize,
}

/// An opened, indexed file.
///
/// Owns both the handle and the index; dropping it releases the handle. All
/// queries take `&self` and may be issued from several threads at once.
pub struct File {
    path: PathBuf,
    handle: PositionedFile,
    index: FileIndex,
    cache: Option<RangeCache>,
}

impl File {
    /// Open and index the file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_cache(path, 0)
    }

    /// Open and index the file, caching up to `cache_capacity` decoded ranges.
    ///
    /// A capacity of zero disables the cache.
    pub fn open_with_cache(path: impl AsRef<Path>, cache_capacity: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs::File::open(&path)
            .and_then(|file| {
                if file.metadata()?.is_dir() {
                    return Err(io::Error::new(io::ErrorKind::IsADirectory, "is a directory"));
                }
                Ok(file)
            })
            .map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;

        // The handle is dropped here if indexing fails
        let index = FileIndex::build(&file)?;
        let cache = NonZeroUsize::new(cache_capacity)
            .map(|capacity| RangeCache::new(capacity, index.size_in_bytes()));

        Ok(Self {
            path,
            handle: PositionedFile::new(file),
            index,
            cache,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    pub fn size(&self) -> FileSize {
        FileSize {
            total_size_in_bytes: self.index.size_in_bytes(),
            number_of_lines: self.index.line_count(),
            size_of_longest_line: LineSize {
                in_bytes: self.index.longest_line_bytes(),
                in_characters: self.index.longest_line_chars(),
            },
        }
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.index.size_in_bytes()
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    pub fn longest_line_bytes(&self) -> u64 {
        self.index.longest_line_bytes()
    }

    pub fn longest_line_chars(&self) -> u64 {
        self.index.longest_line_chars()
    }

    /// Load `count` lines starting at the zero-based `start_line`.
    ///
    /// Lines are decoded lossily with tabs expanded. Fails with
    /// [`Error::OutOfRange`] when the range runs past the last line.
    pub fn load_lines(&self, start_line: i64, count: i64) -> Result<Vec<String>> {
        let (start, count) = reader::check_range(&self.index, start_line, count)?;

        let Some(cache) = &self.cache else {
            return reader::read_lines(&self.handle, &self.index, start, count);
        };

        cache.invalidate_if_resized(self.handle.current_size()?);
        if let Some(lines) = cache.get(start, count) {
            return Ok(lines);
        }

        let lines = reader::read_lines(&self.handle, &self.index, start, count)?;
        cache.put(start, count, lines.clone());
        Ok(lines)
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("path", &self.path)
            .field("size", &self.size())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
