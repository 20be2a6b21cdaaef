//! UI rendering functions.

use std::path::Path;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Focus, ModePage, Screen};
use crate::clipboard::CopyStatus;
use crate::config::ConfigLoadStatus;
use crate::form::FieldEntry;
use crate::modes::{FieldKind, ModeId, mode_config};

pub const STAGE_HEADING: &str = "🫧 现在卡在哪个阶段？";
pub const STAGE_SUBLINE: &str = "先选阶段，再进入只属于这一阶段的解卡页面。";
pub const BACK_HINT: &str = "← 重选阶段";
pub const RESULT_TITLE: &str = "灵感花园回响";

const STAGE_SHORTCUTS: &str = "[Up/Down] Select  [1-3] Open  [Enter] Open  [q] Quit";
const MODE_SHORTCUTS: &str =
    "[Tab] Focus  [F5-F7] Generate  [Ctrl-Y] Copy  [PgUp/PgDn] Scroll  [Esc] Back";

/// Calculate a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Contract a path by replacing the home directory with `~` for display.
pub fn contract_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(suffix) = path.strip_prefix(&home)
    {
        return format!("~/{}", suffix.display());
    }
    path.display().to_string()
}

/// Terminal columns taken by `s`. CJK and emoji count double.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Line and column (in chars) of a char cursor within a multi-line value.
pub fn cursor_position(value: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for c in value.chars().take(cursor) {
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Split a single line at a char cursor into before/cursor/after spans.
fn cursor_spans(text: &str, cursor: Option<usize>) -> Vec<Span<'static>> {
    let value_style = Style::default().fg(Color::White);
    let Some(cursor) = cursor else {
        return vec![Span::styled(text.to_string(), value_style)];
    };

    let before: String = text.chars().take(cursor).collect();
    let mut rest = text.chars().skip(cursor);
    let cursor_char = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = rest.collect();

    vec![
        Span::styled(before, value_style),
        Span::styled(
            cursor_char,
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::styled(after, value_style),
    ]
}

/// Render one form field. Focused text fields show a block cursor.
pub fn field_lines(entry: &FieldEntry, focused: bool) -> Vec<Line<'static>> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let marker = if entry.spec.required {
        Span::styled("* ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("  ")
    };
    let label = Span::styled(format!("{}：", entry.spec.label), label_style);

    match entry.spec.kind {
        FieldKind::Text => {
            let mut spans = vec![marker, label];
            spans.extend(cursor_spans(&entry.value, focused.then_some(entry.cursor)));
            vec![Line::from(spans)]
        }
        FieldKind::Choice(_) => {
            let value_style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            vec![Line::from(vec![
                marker,
                label,
                Span::styled(format!("< {} >", entry.value), value_style),
            ])]
        }
        FieldKind::MultiLine => {
            let mut lines = vec![Line::from(vec![marker, label])];
            let (cursor_line, cursor_col) = cursor_position(&entry.value, entry.cursor);
            // split('\n') keeps a trailing empty line so the cursor can sit there
            for (i, text) in entry.value.split('\n').enumerate() {
                let cursor = (focused && i == cursor_line).then_some(cursor_col);
                let mut spans = vec![Span::raw("    ")];
                spans.extend(cursor_spans(text, cursor));
                lines.push(Line::from(spans));
            }
            lines
        }
    }
}

fn copy_button(status: CopyStatus, focused: bool) -> Span<'static> {
    let color = match status {
        CopyStatus::Idle => Color::White,
        CopyStatus::Copied(_) => Color::Green,
        CopyStatus::Failed(_) => Color::Red,
    };
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color)
    };
    Span::styled(format!(" [ {} ] ", status.label()), style)
}

fn action_line(page: &ModePage) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, action) in mode_config(page.mode()).actions.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if page.focus == Focus::Action(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        spans.push(Span::styled(format!(" F{} {} ", i + 5, action.text), style));
    }
    Line::from(spans)
}

/// Command panel: shortcuts on the left, session on the right.
fn draw_footer(f: &mut Frame, app: &App, area: Rect, shortcuts: &str) {
    let session_text = match (&app.session.session_id, &app.session.logging_error) {
        (Some(id), _) => format!("session {}", id),
        (None, Some(_)) => "logging off".to_string(),
        (None, None) => String::new(),
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let spacing =
        inner_width.saturating_sub(display_width(shortcuts) + display_width(&session_text));

    let line = Line::from(vec![
        Span::styled(shortcuts.to_string(), Style::default().fg(Color::DarkGray)),
        Span::raw(" ".repeat(spacing)),
        Span::styled(session_text, Style::default().fg(Color::DarkGray)),
    ]);
    let panel = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(panel, area);
}

fn draw_stage_gate(f: &mut Frame, app: &App, area: Rect) {
    let mut content = vec![
        Line::from(Span::styled(
            STAGE_HEADING,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            STAGE_SUBLINE,
            Style::default().fg(Color::DarkGray),
        )),
        Line::raw(""),
    ];

    for (i, mode) in ModeId::ALL.iter().enumerate() {
        let config = mode_config(*mode);
        let selected = i == app.stage_selected;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let pointer = if selected { "▶ " } else { "  " };
        content.push(Line::from(vec![
            Span::raw(pointer),
            Span::styled(format!(" {}. {} ", i + 1, config.title), style),
        ]));
        content.push(Line::from(Span::styled(
            format!("     {}", config.note),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let path_style = Style::default().fg(Color::DarkGray);
    content.push(Line::raw(""));
    content.push(Line::from(Span::styled(
        format!("config  {}", contract_path(&app.session.config_path)),
        path_style,
    )));
    if let Some(dir) = &app.session.log_directory {
        content.push(Line::from(Span::styled(
            format!("logs    {}", contract_path(dir)),
            path_style,
        )));
    }

    if let ConfigLoadStatus::Error(message) = &app.session.config_status {
        content.push(Line::from(Span::styled(
            format!("config: {}", message),
            Style::default().fg(Color::Yellow),
        )));
    }

    let widest = content
        .iter()
        .map(|line| line.width())
        .max()
        .unwrap_or(0);
    let width = (widest as u16).saturating_add(6);
    let height = (content.len() as u16).saturating_add(2);
    let gate_area = centered_rect(width, height, area);

    let gate = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(gate, gate_area);
}

fn draw_mode_page(f: &mut Frame, app: &mut App, area: Rect) {
    let Screen::ModePage(page) = &app.screen else {
        return;
    };
    let config = mode_config(page.mode());

    let field_content: Vec<Line<'static>> = page
        .form
        .entries()
        .iter()
        .enumerate()
        .flat_map(|(i, entry)| field_lines(entry, page.focus == Focus::Field(i)))
        .collect();
    let fields = Paragraph::new(field_content)
        .block(Block::default().borders(Borders::ALL).title(" 输入 "))
        .wrap(Wrap { trim: false });
    let fields_height = (fields.line_count(area.width) as u16).min(area.height / 2);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // Title + note
            Constraint::Length(fields_height), // Fields
            Constraint::Length(3),             // Action row
            Constraint::Min(3),                // Result
        ])
        .split(area);

    let header = Paragraph::new(vec![Line::from(Span::styled(
        config.note,
        Style::default().fg(Color::Gray),
    ))])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Line::from(format!(" {} ", config.title)).left_aligned())
            .title(Line::from(format!(" {} [Esc] ", BACK_HINT)).right_aligned()),
    )
    .wrap(Wrap { trim: false });
    f.render_widget(header, chunks[0]);
    f.render_widget(fields, chunks[1]);

    let actions = Paragraph::new(action_line(page))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(actions, chunks[2]);

    let result_content: Vec<Line> = page.result_text().lines().map(Line::raw).collect();
    let result_style = if page.result.is_some() {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let result_block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(format!(" {} ", RESULT_TITLE)).left_aligned())
        .title(Line::from(copy_button(app.copy_status, page.focus == Focus::Copy)).right_aligned());
    let result_panel = Paragraph::new(result_content)
        .style(result_style)
        .block(result_block)
        .wrap(Wrap { trim: false })
        .scroll((page.result_scroll, 0));
    let result_scroll = page.result_scroll;
    f.render_widget(result_panel, chunks[3]);

    // Update result pane dimensions for scroll calculations
    app.result_pane_height = chunks[3].height.saturating_sub(2);
    app.result_pane_width = chunks[3].width;

    let visual_lines = app.result_visual_lines();
    if visual_lines > app.result_pane_height {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(visual_lines as usize)
            .position(result_scroll as usize)
            .viewport_content_length(app.result_pane_height as usize);

        f.render_stateful_widget(scrollbar, chunks[3], &mut scrollbar_state);
    }
}

/// Draw the main UI.
pub fn draw_ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Screen body
            Constraint::Length(3), // Command panel
        ])
        .split(f.area());

    let shortcuts = match app.screen {
        Screen::StageGate => {
            draw_stage_gate(f, app, chunks[0]);
            STAGE_SHORTCUTS
        }
        Screen::ModePage(_) => {
            draw_mode_page(f, app, chunks[0]);
            MODE_SHORTCUTS
        }
    };
    draw_footer(f, app, chunks[1], shortcuts);
}
