use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loginsight::File;
use loginsight::file::LineDescriptor;
use loginsight::file::reader::check_range;
use loginsight::output::{LinePrinter, PrintOptions, number_width};
use loginsight::utils::{format_size, logging, progress};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Lines read per positioned read when printing
const PRINT_BATCH_LINES: usize = 4096;

#[derive(Parser)]
#[command(name = "loginsight")]
#[command(about = "Terminal viewer for very large log files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// File to view (when no subcommand is given)
    path: Option<PathBuf>,

    /// Config file (defaults to config.json in the app data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file in the interactive viewer
    View {
        /// File to view
        path: PathBuf,
    },
    /// Print a range of lines to stdout
    Print {
        /// File to read
        path: PathBuf,

        /// First line to print (0-based)
        #[arg(short, long, default_value_t = 0)]
        start: usize,

        /// Number of lines to print (defaults to the rest of the file)
        #[arg(short, long)]
        count: Option<usize>,

        /// Prefix lines with their line number
        #[arg(short = 'n', long)]
        line_numbers: bool,

        /// Color line numbers
        #[arg(long)]
        color: bool,

        /// Hide the indexing spinner
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show size and line statistics of a file
    Stats {
        /// File to inspect
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let (Some(path), Some(_)) = (&cli.path, &cli.command) {
        anyhow::bail!(
            "Unexpected argument '{}' before the subcommand. Pass the file after it.",
            path.display()
        );
    }

    match cli.command {
        Some(Commands::View { path }) => view(path, cli.config.as_deref())?,
        Some(Commands::Print {
            path,
            start,
            count,
            line_numbers,
            color,
            quiet,
        }) => {
            logging::init_stderr();
            let options = PrintOptions {
                line_numbers,
                color,
                number_width: 0,
            };
            print_lines(&path, start, count, options, quiet)?;
        }
        Some(Commands::Stats { path }) => {
            logging::init_stderr();
            show_stats(&path)?;
        }
        None => match cli.path {
            Some(path) => view(path, cli.config.as_deref())?,
            None => anyhow::bail!("No file given. Run 'loginsight --help' for usage."),
        },
    }

    Ok(())
}

/// Viewer settings from `--config`, or the default location
#[cfg(feature = "interactive")]
fn load_config(path: Option<&Path>) -> Result<loginsight::utils::ViewerConfig> {
    use loginsight::utils::ViewerConfig;

    match path {
        Some(path) => ViewerConfig::load_from(path),
        None => ViewerConfig::load(),
    }
}

#[cfg(feature = "interactive")]
fn view(path: PathBuf, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    // The terminal belongs to the viewer, so logs go to a file
    let log_path = loginsight::utils::get_log_path()?;
    logging::init_file(&log_path)?;

    // Fail before taking over the terminal when the file cannot be read
    std::fs::metadata(&path).with_context(|| format!("Cannot open {}", path.display()))?;

    loginsight::tui::run(path, &config)
}

#[cfg(not(feature = "interactive"))]
fn view(_path: PathBuf, _config_path: Option<&Path>) -> Result<()> {
    anyhow::bail!("Built without the interactive viewer. Use 'loginsight print' instead.")
}

/// Open a file behind a spinner
fn open_indexed(path: &Path, quiet: bool) -> Result<File> {
    let spinner = progress::spinner(format!("Indexing {}...", path.display()), quiet);
    let file = File::open(path);
    spinner.finish_and_clear();
    file.with_context(|| format!("Failed to index {}", path.display()))
}

fn print_lines(
    path: &Path,
    start: usize,
    count: Option<usize>,
    mut options: PrintOptions,
    quiet: bool,
) -> Result<()> {
    let file = open_indexed(path, quiet)?;
    let remaining = file.line_count().saturating_sub(start);

    let count = match count {
        Some(count) => count,
        // Printing an empty file prints nothing
        None if remaining == 0 && start == 0 => return Ok(()),
        None => remaining.max(1),
    };

    let Ok(start_line) = i64::try_from(start) else {
        anyhow::bail!("--start {} is larger than any line number", start);
    };
    let Ok(line_count) = i64::try_from(count) else {
        anyhow::bail!("--count {} is larger than any file", count);
    };
    let (start, count) = check_range(file.index(), start_line, line_count)?;
    options.number_width = number_width(file.line_count());

    let mut printer = LinePrinter::new(options);
    let end = start + count;
    let mut line = start;
    while line < end {
        let batch = (end - line).min(PRINT_BATCH_LINES);
        let lines = file.load_lines(line as i64, batch as i64)?;
        printer.print(line, &lines)?;
        line += batch;
    }
    printer.flush()?;

    Ok(())
}

fn show_stats(path: &Path) -> Result<()> {
    let started = Instant::now();
    let file = open_indexed(path, false)?;
    let elapsed = started.elapsed();
    let size = file.size();

    let index_bytes = size.number_of_lines * std::mem::size_of::<LineDescriptor>();

    println!("File Statistics");
    println!("===============");
    println!();
    println!("Path:             {}", file.path().display());
    println!("Size:             {}", format_size(size.total_size_in_bytes));
    println!("Lines:            {}", size.number_of_lines);
    println!(
        "Longest line:     {} characters ({} bytes)",
        size.size_of_longest_line.in_characters, size.size_of_longest_line.in_bytes
    );
    println!();
    println!("Index time:       {:.1}ms", elapsed.as_secs_f64() * 1000.0);
    println!("Index memory:     {}", format_size(index_bytes as u64));

    Ok(())
}
