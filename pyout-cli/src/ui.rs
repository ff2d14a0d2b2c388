//! Terminal UI rendering for PyOut

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use pyout_core::{App, Mode, Rgb, Theme};

// Catppuccin Mocha chrome colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Editor
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_editor(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Popups/overlays
    match app.mode {
        Mode::ThemePicker => draw_theme_picker(frame, app),
        Mode::Help => draw_help(frame),
        _ => {}
    }
    if let Some(notice) = &app.notice {
        draw_notice(frame, notice);
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dirty = if app.dirty { " *" } else { "" };
    let title_text = format!(
        " PyOut - {}{} [{}]",
        app.title(),
        dirty,
        app.theme.as_str()
    );

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));
    frame.render_widget(title_bar, area);
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let mode_indicator = match app.mode {
        Mode::Insert => " [INSERT]",
        Mode::Visual => " [VISUAL]",
        _ => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title(format!("Editor{}", mode_indicator));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selection = app.selection_rows();
    let annotation = app.annotation();

    let mut lines: Vec<Line> = Vec::new();
    for (idx, line_text) in app.buffer.lines().iter().enumerate() {
        let mut style = Style::default().fg(TEXT);
        if let Some((start, end)) = selection {
            if idx >= start && idx <= end {
                style = style.bg(SURFACE1);
            }
        }

        let mut spans = vec![Span::styled(line_text.clone(), style)];

        // Ghost output pinned past the end of its line
        if let Some(ann) = annotation {
            if ann.line == idx {
                spans.push(Span::styled(
                    ann.text.clone(),
                    Style::default()
                        .fg(to_color(ann.color))
                        .add_modifier(Modifier::ITALIC),
                ));
            }
        }

        lines.push(Line::from(spans));
    }

    // Scroll so the cursor stays visible
    let (row, col) = app.buffer.cursor();
    let visible_height = inner.height as usize;
    let scroll_offset = if visible_height > 0 && row >= visible_height {
        row - visible_height + 1
    } else {
        0
    };

    let paragraph = Paragraph::new(lines).scroll((scroll_offset as u16, 0));
    frame.render_widget(paragraph, inner);

    if inner.width > 0 && inner.height > 0 {
        let x = inner.x + (col as u16).min(inner.width - 1);
        let y = inner.y + (row - scroll_offset) as u16;
        frame.set_cursor_position((x, y));
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Insert => "INSERT",
        Mode::Visual => "VISUAL",
        Mode::ThemePicker => "THEME",
        Mode::Help => "HELP",
    };

    let status = app.status_message.as_deref().unwrap_or("");
    let help_hint = "i edit | v select | t theme | s save | ? help | q quit";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));
    frame.render_widget(status_bar, area);
}

fn draw_theme_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(36, Theme::all().len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title("Select Theme (1-6 or j/k)");

    let items: Vec<ListItem> = Theme::all()
        .iter()
        .enumerate()
        .map(|(i, theme)| {
            let selected = i == app.theme_selected;
            let marker = if selected { ">" } else { " " };
            let color = to_color(theme.color());
            let style = if selected {
                Style::default().fg(color).bg(SURFACE1)
            } else {
                Style::default().fg(color)
            };
            ListItem::new(format!("{} {} {}", i + 1, marker, theme.as_str())).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_notice(frame: &mut Frame, notice: &str) {
    let full = frame.area();
    let area = centered_rect(
        full.width.saturating_sub(10).min(72),
        full.height.saturating_sub(6).min(16),
        full,
    );
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title("PyOut (any key to dismiss)");

    let paragraph = Paragraph::new(notice.to_string())
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(52, 14, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title("Help");

    let text = vec![
        "Lines ending in a call run automatically after a",
        "pause; the last output line appears as ghost text.",
        "",
        "  i          insert mode (Esc to leave)",
        "  h/j/k/l    move cursor",
        "  v          line-wise visual selection",
        "  t          pick annotation theme",
        "  s          save buffer to file",
        "  # explain        trailing marker: explain code",
        "  # take-a-break   marker: open the break page",
        "  ?          this help",
        "  q          quit",
    ];
    let lines: Vec<Line> = text
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(TEXT))))
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// A width x height rect centered in `r`, clamped to fit
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
