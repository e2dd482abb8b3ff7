//! Lossy decoding and measurement shared by the indexer and range reads.
//!
//! Bytes are decoded as UTF-8 with each invalid sequence replaced by U+FFFD,
//! then horizontal tabs are expanded to the next multiple of [`TAB_WIDTH`]
//! columns. The column restarts after `\n` and `\r`.

use std::borrow::Cow;

/// Fixed tab stop, independent of the terminal
pub const TAB_WIDTH: usize = 4;

/// Decode raw bytes into display text
pub fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if memchr::memchr(b'\t', bytes).is_none() {
        return text.into_owned();
    }
    expand_tabs(&text)
}

/// Expand tabs to spaces with a tab width of 4.
pub fn expand_tabs(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut column = 0;

    for c in s.chars() {
        match c {
            '\t' => {
                let spaces = TAB_WIDTH - (column % TAB_WIDTH);
                result.extend(std::iter::repeat_n(' ', spaces));
                column += spaces;
            }
            '\n' | '\r' => {
                result.push(c);
                column = 0;
            }
            _ => {
                result.push(c);
                column += 1;
            }
        }
    }

    result
}

/// Number of characters `decode(bytes)` would produce, without allocating it.
pub fn measure(bytes: &[u8]) -> u64 {
    // Pure ASCII without tabs maps one byte to one character
    if bytes.is_ascii() && memchr::memchr(b'\t', bytes).is_none() {
        return bytes.len() as u64;
    }

    let text: Cow<'_, str> = String::from_utf8_lossy(bytes);
    let mut width = 0u64;
    let mut column = 0usize;

    for c in text.chars() {
        match c {
            '\t' => {
                let spaces = TAB_WIDTH - (column % TAB_WIDTH);
                width += spaces as u64;
                column += spaces;
            }
            '\n' | '\r' => {
                width += 1;
                column = 0;
            }
            _ => {
                width += 1;
                column += 1;
            }
        }
    }

    width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs_aligns_to_stop() {
        assert_eq!(expand_tabs("\tx"), "    x");
        assert_eq!(expand_tabs("ab\tc"), "ab  c");
        assert_eq!(expand_tabs("abcd\te"), "abcd    e");
        assert_eq!(expand_tabs("a\r\tb"), "a\r    b");
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        assert_eq!(decode(b"ok\xffok"), "ok\u{FFFD}ok");
        // Truncated 4-byte sequence at the end of a buffer
        assert_eq!(decode(b"x\xf0\x9f\x91"), "x\u{FFFD}");
    }

    #[test]
    fn test_measure_matches_decode() {
        let samples: [&[u8]; 7] = [
            b"",
            b"plain ascii",
            b"\tindented",
            b"col\t\tumns",
            "👉 bar baz".as_bytes(),
            b"bad \xc3\x28 byte",
            b"crlf line\r",
        ];
        for sample in samples {
            assert_eq!(
                measure(sample),
                decode(sample).chars().count() as u64,
                "sample {:?}",
                sample
            );
        }
    }

    #[test]
    fn test_measure_counts_scalars_not_bytes() {
        let line = "👉 foo".as_bytes();
        assert_eq!(line.len(), 8);
        assert_eq!(measure(line), 5);
    }
}
