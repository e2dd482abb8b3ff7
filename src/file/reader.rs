//! Range reads: fetch a contiguous run of lines with one positioned read.

use crate::error::{Error, Result};
use crate::file::index::{DELIMITER, FileIndex};
use crate::utils::text::decode;
use std::fs;
use std::io;
use tracing::trace;

#[cfg(not(unix))]
use std::sync::Mutex;

/// Read at an explicit offset without touching a shared cursor
pub trait ReadAt {
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()>;
}

impl ReadAt for [u8] {
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let start = usize::try_from(offset)
            .map_err(|_| io::Error::new(io::ErrorKind::UnexpectedEof, "offset past end"))?;
        let end = start
            .checked_add(buf.len())
            .filter(|&end| end <= self.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end"))?;
        buf.copy_from_slice(&self[start..end]);
        Ok(())
    }
}

/// File handle serving positioned reads.
///
/// Unix reads are natively positional and safe to issue concurrently. Elsewhere
/// the read is a seek followed by a read, so it is serialized behind a lock.
#[derive(Debug)]
pub struct PositionedFile {
    #[cfg(unix)]
    file: fs::File,
    #[cfg(not(unix))]
    file: Mutex<fs::File>,
}

impl PositionedFile {
    pub fn new(file: fs::File) -> Self {
        Self {
            #[cfg(unix)]
            file,
            #[cfg(not(unix))]
            file: Mutex::new(file),
        }
    }

    /// Current on-disk length of the file
    pub fn current_size(&self) -> io::Result<u64> {
        #[cfg(unix)]
        {
            Ok(self.file.metadata()?.len())
        }
        #[cfg(not(unix))]
        {
            Ok(self.lock()?.metadata()?.len())
        }
    }

    #[cfg(not(unix))]
    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, fs::File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("file handle lock poisoned"))
    }
}

impl ReadAt for PositionedFile {
    #[cfg(unix)]
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)
    }

    #[cfg(not(unix))]
    fn read_exact_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        use std::io::{Read, Seek, SeekFrom};
        let mut file = self.lock()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}

/// Validate a requested range against the index.
///
/// Returns the range as `(start_line, count)` in index units.
pub fn check_range(index: &FileIndex, start_line: i64, count: i64) -> Result<(usize, usize)> {
    if start_line < 0 {
        return Err(Error::InvalidArgument(format!(
            "start_line is {} but must be >= 0",
            start_line
        )));
    }
    if count < 1 {
        return Err(Error::InvalidArgument(format!(
            "count is {} but must be >= 1",
            count
        )));
    }

    let line_count = index.line_count();
    let out_of_range = || Error::OutOfRange {
        start_line: start_line as u64,
        count: count as u64,
        line_count: line_count as u64,
    };

    let start = usize::try_from(start_line).map_err(|_| out_of_range())?;
    let count = usize::try_from(count).map_err(|_| out_of_range())?;
    match start.checked_add(count) {
        Some(end) if end <= line_count => Ok((start, count)),
        _ => Err(out_of_range()),
    }
}

/// Byte span `(offset, length)` covering `count` lines from `start`.
///
/// Includes the delimiters between the lines but not the one after the last.
/// The range must already be checked.
pub fn byte_span(index: &FileIndex, start: usize, count: usize) -> (u64, u64) {
    let lines = &index.lines()[start..start + count];
    let first = lines[0];
    let last = lines[lines.len() - 1];
    (first.start_offset, last.end_offset() - first.start_offset)
}

/// Read `count` checked lines starting at `start` from `source`
pub fn read_lines<R: ReadAt + ?Sized>(
    source: &R,
    index: &FileIndex,
    start: usize,
    count: usize,
) -> Result<Vec<String>> {
    let (offset, length) = byte_span(index, start, count);
    let length = usize::try_from(length)
        .map_err(|_| io::Error::new(io::ErrorKind::OutOfMemory, "range too large to read"))?;

    let mut raw = vec![0u8; length];
    source.read_exact_at(&mut raw, offset)?;
    trace!(start, count, offset, length, "read line range");

    let text = decode(&raw);
    // Guard against an extra trailing element when the range ends at EOF
    let lines: Vec<String> = text
        .split(DELIMITER as char)
        .take(count)
        .map(str::to_owned)
        .collect();

    Ok(lines)
}

/// Load `count` lines starting at `start_line`.
///
/// Fails with [`Error::InvalidArgument`] for a negative start or a count below
/// one, and with [`Error::OutOfRange`] when the range extends past the last line.
pub fn load_lines<R: ReadAt + ?Sized>(
    source: &R,
    index: &FileIndex,
    start_line: i64,
    count: i64,
) -> Result<Vec<String>> {
    let (start, count) = check_range(index, start_line, count)?;
    read_lines(source, index, start, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &[u8], start_line: i64, count: i64) -> Result<Vec<String>> {
        let index = FileIndex::scan(content);
        load_lines(content, &index, start_line, count)
    }

    #[test]
    fn test_byte_span_excludes_final_delimiter() {
        let index = FileIndex::scan(b"foo\nbar\nbaz\n");
        assert_eq!(byte_span(&index, 0, 1), (0, 3));
        assert_eq!(byte_span(&index, 0, 2), (0, 7));
        assert_eq!(byte_span(&index, 1, 2), (4, 7));
        assert_eq!(byte_span(&index, 3, 1), (12, 0));
    }

    #[test]
    fn test_byte_span_matches_length_sum() {
        let index = FileIndex::scan(b"a\nbb\n\nccc\nd");
        for start in 0..index.line_count() {
            for count in 1..=index.line_count() - start {
                let expected: u64 = index.lines()[start..start + count]
                    .iter()
                    .map(|l| l.byte_length)
                    .sum::<u64>()
                    + (count as u64 - 1);
                assert_eq!(byte_span(&index, start, count).1, expected);
            }
        }
    }

    #[test]
    fn test_load_lines() {
        assert_eq!(load(b"foo\nbar", 0, 2).unwrap(), vec!["foo", "bar"]);
        assert_eq!(load(b"foo\nbar", 1, 1).unwrap(), vec!["bar"]);
        assert_eq!(load(b"\n", 0, 2).unwrap(), vec!["", ""]);
        assert_eq!(load(b"\n\n", 1, 2).unwrap(), vec!["", ""]);
        assert_eq!(load(b"\nfoo\n", 1, 2).unwrap(), vec!["foo", ""]);
    }

    #[test]
    fn test_load_lines_decodes() {
        assert_eq!(load(b"a\tb\n\xffz", 0, 2).unwrap(), vec!["a   b", "\u{FFFD}z"]);
    }

    #[test]
    fn test_invalid_arguments() {
        let samples: [&[u8]; 3] = [b"", b"foobar", b"a\nb\nc"];
        for content in samples {
            assert!(load(content, -1, 1).unwrap_err().is_invalid_argument());
            assert!(load(content, 0, 0).unwrap_err().is_invalid_argument());
            assert!(load(content, 1, -5).unwrap_err().is_invalid_argument());
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(load(b"", 0, 1).unwrap_err().is_out_of_range());
        assert!(load(b"foo", 0, 2).unwrap_err().is_out_of_range());
        assert!(load(b"foo", 1, 1).unwrap_err().is_out_of_range());
        assert!(load(b"foo\nbar", 0, 3).unwrap_err().is_out_of_range());
        assert!(load(b"foo", i64::MAX, i64::MAX).unwrap_err().is_out_of_range());
    }

    #[test]
    fn test_slice_read_at_bounds() {
        let data: &[u8] = b"abc";
        let mut buf = [0u8; 2];
        data.read_exact_at(&mut buf, 1).unwrap();
        assert_eq!(&buf, b"bc");
        assert!(data.read_exact_at(&mut buf, 2).is_err());
    }
}
