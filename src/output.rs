//! Plain-text output of line ranges for `loginsight print`

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// How printed lines are decorated
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    /// Prefix each line with its 1-based line number
    pub line_numbers: bool,
    /// Width the line number column is padded to
    pub number_width: usize,
    pub color: bool,
}

/// Line-range printer writing to stdout
pub struct LinePrinter {
    stdout: StandardStream,
    options: PrintOptions,
}

impl LinePrinter {
    pub fn new(options: PrintOptions) -> Self {
        let choice = if options.color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(choice),
            options,
        }
    }

    /// Print `lines`, the first of which is line `first_line` (0-based)
    pub fn print(&mut self, first_line: usize, lines: &[String]) -> io::Result<()> {
        write_lines(&mut self.stdout, &self.options, first_line, lines)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Write lines with optional colored line numbers
pub fn write_lines<W: WriteColor>(
    out: &mut W,
    options: &PrintOptions,
    first_line: usize,
    lines: &[String],
) -> io::Result<()> {
    for (offset, line) in lines.iter().enumerate() {
        if options.line_numbers {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(
                out,
                "{:>width$}",
                first_line + offset + 1,
                width = options.number_width
            )?;
            out.reset()?;
            write!(out, ":")?;
        }
        writeln!(out, "{}", line)?;
    }

    Ok(())
}

/// Digits needed to print the largest line number of a file
pub fn number_width(line_count: usize) -> usize {
    line_count.max(1).to_string().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    fn render(options: PrintOptions, first_line: usize, lines: &[&str]) -> String {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        let mut out = NoColor::new(Vec::new());
        write_lines(&mut out, &options, first_line, &lines).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_lines() {
        assert_eq!(
            render(PrintOptions::default(), 0, &["foo", "", "bar"]),
            "foo\n\nbar\n"
        );
    }

    #[test]
    fn test_numbered_lines() {
        let options = PrintOptions {
            line_numbers: true,
            number_width: 3,
            color: false,
        };
        assert_eq!(render(options, 98, &["a", "b"]), " 99:a\n100:b\n");
    }

    #[test]
    fn test_number_width() {
        assert_eq!(number_width(0), 1);
        assert_eq!(number_width(9), 1);
        assert_eq!(number_width(10), 2);
        assert_eq!(number_width(12345), 5);
    }
}
