use crate::tui::app::{App, Mode};
use crate::utils::format_size;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const HELP_TEXT: &[(&str, &str)] = &[
    ("j / Down", "next line"),
    ("k / Up", "previous line"),
    ("PageDown / Ctrl+f", "next page"),
    ("PageUp / Ctrl+b", "previous page"),
    ("Ctrl+d / Ctrl+u", "half page down / up"),
    ("gg / G", "first / last line"),
    ("l / Right", "scroll right"),
    ("h / Left", "scroll left"),
    ("0", "first column"),
    ("n", "toggle line numbers"),
    ("? / F1", "this help"),
    ("q / Esc", "quit"),
];

/// Split the frame into body and status bar
pub fn layout(area: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // File content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    [chunks[0], chunks[1]]
}

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let [body, status] = layout(area);

    draw_body(f, app, body);
    draw_status_bar(f, app, status);

    if app.mode == Mode::Help {
        draw_help(f, area);
    }
}

fn draw_body(f: &mut Frame, app: &App, area: Rect) {
    let gutter = app.gutter_width();
    let text_width = app.text_width();
    let number_style = Style::default().fg(Color::DarkGray);

    // Rows past the end of the file are left blank
    let lines: Vec<Line> = app
        .visible
        .iter()
        .enumerate()
        .map(|(row, content)| {
            let mut spans = Vec::with_capacity(2);
            if gutter > 0 {
                spans.push(Span::styled(
                    format!("{:>width$} ", app.top_line + row + 1, width = gutter - 1),
                    number_style,
                ));
            }
            spans.push(Span::raw(visible_slice(content, app.left_column, text_width)));
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

/// Characters `[left, left + width)` of a decoded line, control characters masked
fn visible_slice(line: &str, left: usize, width: usize) -> String {
    line.chars()
        .skip(left)
        .take(width)
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let style = Style::default().fg(Color::Black).bg(Color::Cyan);

    let text = if let Some(secs) = app.loading_secs() {
        format!(" {} ({:.1}s)", app.status_message, secs)
    } else if let Some(file) = app.file() {
        let position = match app.visible_range() {
            Some((first, last)) => format!("lines {}-{} of {}", first, last, file.line_count()),
            None => format!("{} lines", file.line_count()),
        };
        let mut text = format!(
            " {} | {} | {} | longest {} chars | col {}",
            app.path.display(),
            position,
            format_size(file.size_in_bytes()),
            file.longest_line_chars(),
            app.left_column + 1,
        );
        if !app.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&app.status_message);
        }
        text
    } else {
        format!(" {}", app.status_message)
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:>18}  ", keys), key_style),
                Span::raw(*action),
            ])
        })
        .collect();

    let width = 48.min(area.width);
    let height = (HELP_TEXT.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Keys ")),
        popup,
    );
}
