//! Line index built from a single forward scan over the file.

use crate::error::Result;
use crate::utils::text::measure;
use memchr::memchr_iter;
use memmap2::Mmap;
use std::fs;
use std::time::Instant;
use tracing::debug;

/// Line delimiter
pub const DELIMITER: u8 = b'\n';

/// Location and measured width of one physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDescriptor {
    /// Byte offset of the first byte of the line
    pub start_offset: u64,
    /// Bytes in the line, excluding the delimiter
    pub byte_length: u64,
    /// Characters after lossy decoding and tab expansion
    pub char_length: u64,
}

impl LineDescriptor {
    /// Offset of the delimiter ending this line, or end of file for the last line
    #[inline]
    pub fn end_offset(&self) -> u64 {
        self.start_offset + self.byte_length
    }
}

/// Ordered table of line descriptors with aggregates cached at build time.
///
/// Immutable once built. An empty file has no lines; any other file has at
/// least one, including the empty line following a final delimiter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    lines: Vec<LineDescriptor>,
    size_in_bytes: u64,
    longest_line_bytes: u64,
    longest_line_chars: u64,
}

impl FileIndex {
    /// Index an opened file through a read-only memory map
    pub fn build(file: &fs::File) -> Result<Self> {
        let started = Instant::now();
        let size = file.metadata()?.len();

        // Mapping a zero-length file fails on some platforms
        if size == 0 {
            debug!("empty file, nothing to index");
            return Ok(Self::default());
        }

        // SAFETY: the mapping is read-only and files are treated as immutable
        // for the lifetime of a session
        let mmap = unsafe { Mmap::map(file)? };

        #[cfg(unix)]
        let _ = mmap.advise(memmap2::Advice::Sequential);

        let index = Self::scan(&mmap);

        debug!(
            size_in_bytes = index.size_in_bytes,
            lines = index.line_count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "indexed file"
        );

        Ok(index)
    }

    /// Index an in-memory buffer
    pub fn scan(content: &[u8]) -> Self {
        let mut index = Self {
            size_in_bytes: content.len() as u64,
            ..Self::default()
        };

        if content.is_empty() {
            return index;
        }

        let mut start = 0usize;
        for newline in memchr_iter(DELIMITER, content) {
            index.push(start, &content[start..newline]);
            start = newline + 1;
        }
        // Trailing line; empty when the content ends on a delimiter
        index.push(start, &content[start..]);

        index
    }

    fn push(&mut self, start: usize, line: &[u8]) {
        let descriptor = LineDescriptor {
            start_offset: start as u64,
            byte_length: line.len() as u64,
            char_length: measure(line),
        };

        self.longest_line_bytes = self.longest_line_bytes.max(descriptor.byte_length);
        self.longest_line_chars = self.longest_line_chars.max(descriptor.char_length);
        self.lines.push(descriptor);
    }

    pub fn lines(&self) -> &[LineDescriptor] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.size_in_bytes
    }

    /// Longest line in raw bytes (informational)
    pub fn longest_line_bytes(&self) -> u64 {
        self.longest_line_bytes
    }

    /// Longest line in display characters; use this to size viewports
    pub fn longest_line_chars(&self) -> u64 {
        self.longest_line_chars
    }
}
