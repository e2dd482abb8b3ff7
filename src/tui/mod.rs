mod app;
mod ui;

pub use app::{App, Mode};

use crate::utils::ViewerConfig;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run(path: PathBuf, config: &ViewerConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;

    // Create app state (instant - file indexes in background)
    let mut app = App::new(path, config);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        // Check for background index completion (non-blocking)
        app.poll_file_load();

        let size = terminal.size()?;
        let [body, _] = ui::layout(Rect::new(0, 0, size.width, size.height));
        app.resize(body.width as usize, body.height as usize);
        app.refresh();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for events with timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            // Only handle key press events, not release or repeat
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, key) {
                    return Ok(());
                }
            }
            // Resize events are picked up by the size check on the next pass
        }
    }
}

/// Apply a key press. Returns true when the viewer should exit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    // Global keybindings
    if let (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('q')) =
        (key.modifiers, key.code)
    {
        return true;
    }

    if app.mode == Mode::Help {
        // In help mode, any key closes help
        app.hide_help();
        return false;
    }

    // Handle pending 'g' key for gg command
    if app.pending_key == Some('g') {
        app.clear_pending_key();
        if key.code == KeyCode::Char('g') {
            app.scroll_to_top();
            return false;
        }
        // If not 'g', fall through to normal handling
    }

    match (key.modifiers, key.code) {
        // Vim: Ctrl+f / Ctrl+b - full page
        (KeyModifiers::CONTROL, KeyCode::Char('f')) => app.page_down(),
        (KeyModifiers::CONTROL, KeyCode::Char('b')) => app.page_up(),
        // Vim: Ctrl+d / Ctrl+u - half page
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => app.half_page_down(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.half_page_up(),
        // Non-Ctrl keybindings
        (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
            KeyCode::Esc | KeyCode::Char('q') => return true,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Enter => app.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_up(1),
            KeyCode::PageDown | KeyCode::Char(' ') => app.page_down(),
            KeyCode::PageUp => app.page_up(),
            KeyCode::Right | KeyCode::Char('l') => app.scroll_right(),
            KeyCode::Left | KeyCode::Char('h') => app.scroll_left(),
            KeyCode::Home => app.scroll_to_top(),
            KeyCode::End => app.scroll_to_bottom(),
            KeyCode::Char('0') => app.scroll_to_line_start(),
            // Start 'gg' sequence for vim-style go to top
            KeyCode::Char('g') => app.pending_key = Some('g'),
            KeyCode::Char('G') => app.scroll_to_bottom(),
            KeyCode::Char('n') => app.toggle_line_numbers(),
            KeyCode::Char('?') | KeyCode::F(1) => app.show_help(),
            _ => {}
        },
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::File;
    use std::io::Write;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn app() -> (tempfile::NamedTempFile, App) {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        let content: String = (0..50).map(|i| format!("{}\n", i)).collect();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let file = File::open(tmp.path()).unwrap();
        let mut app = App::with_file(file, &ViewerConfig::default());
        app.resize(40, 10);
        (tmp, app)
    }

    #[test]
    fn test_gg_and_g() {
        let (_tmp, mut app) = app();
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.top_line, 41);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.pending_key, Some('g'));
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.top_line, 0);
        assert_eq!(app.pending_key, None);
    }

    #[test]
    fn test_pending_g_falls_through() {
        let (_tmp, mut app) = app();
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.top_line, 1);
        assert_eq!(app.pending_key, None);
    }

    #[test]
    fn test_ctrl_paging() {
        let (_tmp, mut app) = app();
        ctrl(&mut app, 'f');
        assert_eq!(app.top_line, 10);
        ctrl(&mut app, 'd');
        assert_eq!(app.top_line, 15);
        ctrl(&mut app, 'u');
        ctrl(&mut app, 'b');
        assert_eq!(app.top_line, 0);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (_tmp, mut app) = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.mode, Mode::View);
    }

    #[test]
    fn test_quit_keys() {
        let (_tmp, mut app) = app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(press(&mut app, KeyCode::Esc));
        assert!(ctrl(&mut app, 'c'));
    }
}
