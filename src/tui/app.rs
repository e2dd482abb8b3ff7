use crate::file::File;
use crate::output::number_width;
use crate::utils::ViewerConfig;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
}

/// File indexing state for background loading
pub enum FileLoadState {
    /// File is being indexed in background
    Loading {
        receiver: Receiver<Result<File, String>>,
        started: Instant,
    },
    /// File indexed and ready for range reads
    Ready(File),
    /// Opening or indexing failed (error message stored in status_message)
    Failed,
}

/// Viewer state.
///
/// Only the lines of the current viewport are held; every scroll or resize
/// re-requests them from the file.
pub struct App {
    pub path: PathBuf,
    pub mode: Mode,
    /// Pending key for vim multi-key commands (e.g., 'g' for 'gg')
    pub pending_key: Option<char>,
    /// First line shown (0-based)
    pub top_line: usize,
    /// First column shown after tab expansion
    pub left_column: usize,
    pub line_numbers: bool,
    pub status_message: String,
    /// Lines currently on screen
    pub visible: Vec<String>,
    viewport_width: usize,
    viewport_height: usize,
    scroll_step: usize,
    load_state: FileLoadState,
    dirty: bool,
}

impl App {
    /// Create the app and start indexing `path` on a background thread
    pub fn new(path: PathBuf, config: &ViewerConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let path_for_thread = path.clone();
        let cache_capacity = config.range_cache_capacity;

        thread::spawn(move || {
            let result =
                File::open_with_cache(&path_for_thread, cache_capacity).map_err(|e| e.to_string());
            let _ = tx.send(result);
        });

        Self {
            status_message: format!("Indexing {}...", path.display()),
            path,
            mode: Mode::View,
            pending_key: None,
            top_line: 0,
            left_column: 0,
            line_numbers: config.line_numbers,
            visible: Vec::new(),
            viewport_width: 0,
            viewport_height: 0,
            scroll_step: config.effective_scroll_step(),
            load_state: FileLoadState::Loading {
                receiver: rx,
                started: Instant::now(),
            },
            dirty: true,
        }
    }

    /// Create the app around an already indexed file
    pub fn with_file(file: File, config: &ViewerConfig) -> Self {
        Self {
            path: file.path().to_path_buf(),
            mode: Mode::View,
            pending_key: None,
            top_line: 0,
            left_column: 0,
            line_numbers: config.line_numbers,
            status_message: String::new(),
            visible: Vec::new(),
            viewport_width: 0,
            viewport_height: 0,
            scroll_step: config.effective_scroll_step(),
            load_state: FileLoadState::Ready(file),
            dirty: true,
        }
    }

    /// Check for background index completion (call this in event loop)
    pub fn poll_file_load(&mut self) {
        // Take ownership of the state temporarily
        let current_state = std::mem::replace(&mut self.load_state, FileLoadState::Failed);

        self.load_state = match current_state {
            FileLoadState::Loading { receiver, started } => match receiver.try_recv() {
                Ok(Ok(file)) => {
                    info!(
                        path = %self.path.display(),
                        lines = file.line_count(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "file ready"
                    );
                    self.status_message.clear();
                    self.dirty = true;
                    FileLoadState::Ready(file)
                }
                Ok(Err(e)) => {
                    warn!(path = %self.path.display(), error = %e, "failed to open file");
                    self.status_message = format!("Failed to open file: {}", e);
                    FileLoadState::Failed
                }
                Err(TryRecvError::Empty) => FileLoadState::Loading { receiver, started },
                Err(TryRecvError::Disconnected) => {
                    self.status_message = "Indexing thread terminated unexpectedly".to_string();
                    FileLoadState::Failed
                }
            },
            other => other,
        };
    }

    pub fn file(&self) -> Option<&File> {
        match &self.load_state {
            FileLoadState::Ready(file) => Some(file),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, FileLoadState::Loading { .. })
    }

    /// Seconds spent indexing so far, while loading
    pub fn loading_secs(&self) -> Option<f64> {
        match &self.load_state {
            FileLoadState::Loading { started, .. } => Some(started.elapsed().as_secs_f64()),
            _ => None,
        }
    }

    fn line_count(&self) -> usize {
        self.file().map(File::line_count).unwrap_or(0)
    }

    /// Set the body area size; a change re-requests the visible lines
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.viewport_width || height != self.viewport_height {
            self.viewport_width = width;
            self.viewport_height = height;
            self.dirty = true;
            self.clamp();
        }
    }

    /// Columns taken by the line number gutter, including its separator
    pub fn gutter_width(&self) -> usize {
        if self.line_numbers {
            number_width(self.line_count()) + 1
        } else {
            0
        }
    }

    /// Columns left for line content
    pub fn text_width(&self) -> usize {
        self.viewport_width.saturating_sub(self.gutter_width())
    }

    fn max_top_line(&self) -> usize {
        self.line_count().saturating_sub(self.viewport_height)
    }

    /// Horizontal scroll is bounded by the widest line in characters
    fn max_left_column(&self) -> usize {
        let longest = self.file().map(File::longest_line_chars).unwrap_or(0) as usize;
        longest.saturating_sub(self.text_width())
    }

    fn clamp(&mut self) {
        self.top_line = self.top_line.min(self.max_top_line());
        self.left_column = self.left_column.min(self.max_left_column());
    }

    fn set_position(&mut self, top_line: usize, left_column: usize) {
        let previous = (self.top_line, self.left_column);
        self.top_line = top_line;
        self.left_column = left_column;
        self.clamp();
        if (self.top_line, self.left_column) != previous {
            self.dirty = true;
        }
    }

    /// Re-request the visible range if anything moved
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        self.visible.clear();

        let count = self
            .line_count()
            .saturating_sub(self.top_line)
            .min(self.viewport_height);
        if count == 0 {
            return;
        }

        let result = match self.file() {
            Some(file) => file.load_lines(self.top_line as i64, count as i64),
            None => return,
        };

        match result {
            Ok(lines) => self.visible = lines,
            // Past the end: nothing more to render, rows stay blank
            Err(e) if e.is_out_of_range() => {}
            Err(e) => {
                warn!(top_line = self.top_line, count, error = %e, "failed to load lines");
                self.status_message = format!("Read failed: {}", e);
            }
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.set_position(self.top_line.saturating_add(lines), self.left_column);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.set_position(self.top_line.saturating_sub(lines), self.left_column);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height / 2).max(1));
    }

    /// Jump to first line (vim 'gg')
    pub fn scroll_to_top(&mut self) {
        self.set_position(0, self.left_column);
    }

    /// Jump to last page (vim 'G')
    pub fn scroll_to_bottom(&mut self) {
        self.set_position(usize::MAX, self.left_column);
    }

    pub fn scroll_right(&mut self) {
        self.set_position(self.top_line, self.left_column.saturating_add(self.scroll_step));
    }

    pub fn scroll_left(&mut self) {
        self.set_position(self.top_line, self.left_column.saturating_sub(self.scroll_step));
    }

    /// Back to the first column (vim '0')
    pub fn scroll_to_line_start(&mut self) {
        self.set_position(self.top_line, 0);
    }

    pub fn toggle_line_numbers(&mut self) {
        self.line_numbers = !self.line_numbers;
        self.clamp();
        self.dirty = true;
    }

    pub fn show_help(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn hide_help(&mut self) {
        self.mode = Mode::View;
    }

    /// Clear pending key state
    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    /// Range of 1-based line numbers on screen, if any
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        if self.visible.is_empty() {
            None
        } else {
            Some((self.top_line + 1, self.top_line + self.visible.len()))
        }
    }
}
