//! Rendering: a pure projection of the session state onto the terminal.
//! Sidebar, conversation log with the live streaming buffer, the detail
//! affordance hint, the input line, and a status bar.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::constants::{ERROR_PREFIX, SIDEBAR_WIDTH, STREAM_CURSOR};
use crate::state::{Phase, Role, State};

// Warm theme, teal-leaning for the water domain
mod theme {
    use ratatui::style::Color;

    pub const ACCENT: Color = Color::Rgb(86, 182, 194);        // Water teal
    pub const WARNING: Color = Color::Rgb(229, 192, 123);      // Warm amber
    pub const ERROR: Color = Color::Rgb(224, 108, 117);        // Soft red

    pub const TEXT: Color = Color::Rgb(240, 240, 240);
    pub const TEXT_MUTED: Color = Color::Rgb(144, 144, 144);

    pub const BG_BASE: Color = Color::Rgb(30, 34, 38);
    pub const BG_INPUT: Color = Color::Rgb(44, 50, 56);

    pub const BORDER: Color = Color::Rgb(62, 70, 78);

    pub const USER: Color = Color::Rgb(86, 182, 194);
    pub const ASSISTANT: Color = Color::Rgb(170, 170, 170);
}

mod chars {
    pub const USER_PREFIX: &str = "▸ you";
    pub const ASSISTANT_PREFIX: &str = "● aquasathi";
    pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

pub fn render(frame: &mut Frame, state: &mut State) {
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(theme::BG_BASE)), area);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(main_layout[0]);

    render_sidebar(frame, state, body_layout[0]);
    render_chat(frame, state, body_layout[1]);
    render_status_bar(frame, state, main_layout[1]);
}

fn render_sidebar(frame: &mut Frame, state: &State, area: Rect) {
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled("  💧 AquaSathi", Style::default().fg(theme::ACCENT).bold())),
        Line::from(""),
        Line::from(Span::styled(
            "  AI guide for hygiene, safe",
            Style::default().fg(theme::TEXT_MUTED),
        )),
        Line::from(Span::styled(
            "  water, and sanitation.",
            Style::default().fg(theme::TEXT_MUTED),
        )),
        Line::from(""),
        Line::from(Span::styled("  Ask about:", Style::default().fg(theme::TEXT))),
        Line::from(Span::styled("   - water hygiene", Style::default().fg(theme::TEXT_MUTED))),
        Line::from(Span::styled("   - safe sanitation", Style::default().fg(theme::TEXT_MUTED))),
        Line::from(Span::styled("   - conservation tips", Style::default().fg(theme::TEXT_MUTED))),
        Line::from(""),
    ];

    if state.transcript.is_empty() && !state.is_streaming {
        lines.push(Line::from(Span::styled(
            "  Start chatting to see",
            Style::default().fg(theme::TEXT_MUTED).italic(),
        )));
        lines.push(Line::from(Span::styled(
            "  more options.",
            Style::default().fg(theme::TEXT_MUTED).italic(),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Ctrl+L ", Style::default().fg(theme::ACCENT)),
            Span::styled("clear chat", Style::default().fg(theme::TEXT_MUTED)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Ctrl+Q ", Style::default().fg(theme::ACCENT)),
        Span::styled("quit", Style::default().fg(theme::TEXT_MUTED)),
    ]));

    let sidebar = Paragraph::new(lines)
        .block(Block::default().borders(Borders::RIGHT).border_style(Style::default().fg(theme::BORDER)));
    frame.render_widget(sidebar, area);
}

fn render_chat(frame: &mut Frame, state: &mut State, area: Rect) {
    let chat_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Conversation log
            Constraint::Length(1), // Detail affordance hint
            Constraint::Length(3), // Input box
        ])
        .split(area);

    render_conversation(frame, state, chat_layout[0]);
    render_detail_hint(frame, state, chat_layout[1]);
    render_input(frame, state, chat_layout[2]);
}

fn role_header(role: Role) -> Line<'static> {
    match role {
        Role::User => Line::from(Span::styled(chars::USER_PREFIX, Style::default().fg(theme::USER).bold())),
        Role::Assistant => {
            Line::from(Span::styled(chars::ASSISTANT_PREFIX, Style::default().fg(theme::ASSISTANT).bold()))
        }
    }
}

fn text_lines(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|l| {
            let style = if l.contains(ERROR_PREFIX) {
                Style::default().fg(theme::ERROR)
            } else {
                Style::default().fg(theme::TEXT)
            };
            Line::from(Span::styled(l.to_string(), style))
        })
        .collect()
}

fn render_conversation(frame: &mut Frame, state: &mut State, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for turn in state.transcript.turns() {
        lines.push(role_header(turn.role));
        lines.extend(text_lines(&turn.text));
        lines.push(Line::from(""));
    }

    // Live streaming buffer, with the blinking-cursor glyph at the tail
    if state.is_streaming {
        lines.push(role_header(Role::Assistant));
        let mut streamed = text_lines(&state.streaming);
        if let Some(last) = streamed.last_mut() {
            last.push_span(Span::styled(STREAM_CURSOR, Style::default().fg(theme::ACCENT)));
        } else {
            streamed.push(Line::from(Span::styled(STREAM_CURSOR, Style::default().fg(theme::ACCENT))));
        }
        lines.extend(streamed);
    }

    // Stick to the bottom unless the user scrolled away
    let width = area.width.max(1) as usize;
    let total: usize = lines.iter().map(|l| wrapped_height(l, width)).sum();
    let visible = area.height as usize;
    let max_scroll = total.saturating_sub(visible);
    if state.scroll_offset as usize > max_scroll {
        state.scroll_offset = max_scroll as f32;
    }
    let from_top = if state.user_scrolled {
        max_scroll.saturating_sub(state.scroll_offset as usize)
    } else {
        max_scroll
    };

    let log = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((from_top as u16, 0));
    frame.render_widget(log, area);
}

/// Number of terminal rows a line occupies after wrapping.
fn wrapped_height(line: &Line, width: usize) -> usize {
    let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
    w.div_ceil(width).max(1)
}

fn render_detail_hint(frame: &mut Frame, state: &State, area: Rect) {
    let line = if state.pending_detail.affordance_visible {
        Line::from(vec![
            Span::styled(" 🔍 ", Style::default()),
            Span::styled("Ctrl+D", Style::default().fg(theme::WARNING).bold()),
            Span::styled(" more details", Style::default().fg(theme::TEXT_MUTED)),
        ])
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input(frame: &mut Frame, state: &State, area: Rect) {
    let input = Paragraph::new(if state.input.is_empty() && !state.is_streaming {
        Line::from(Span::styled(
            "Ask something about water, hygiene, or sanitation...",
            Style::default().fg(theme::TEXT_MUTED).italic(),
        ))
    } else {
        Line::from(Span::styled(state.input.clone(), Style::default().fg(theme::TEXT)))
    })
    .style(Style::default().bg(theme::BG_INPUT))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme::BORDER)));
    frame.render_widget(input, area);

    if !state.is_streaming {
        let cursor_x = area.x + 1 + state.input[..state.input_cursor].width() as u16;
        let cursor_x = cursor_x.min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_status_bar(frame: &mut Frame, state: &State, area: Rect) {
    let spinner = chars::SPINNER[(state.spinner_frame as usize) % chars::SPINNER.len()];
    let status = match state.phase {
        Phase::AwaitingShortAnswer if state.is_streaming => {
            Span::styled(format!(" {} Thinking...", spinner), Style::default().fg(theme::ACCENT))
        }
        Phase::AwaitingDetailedAnswer if state.is_streaming => Span::styled(
            format!(" {} Generating detailed response...", spinner),
            Style::default().fg(theme::ACCENT),
        ),
        _ => Span::styled(
            format!(" {} turn(s)", state.transcript.len()),
            Style::default().fg(theme::TEXT_MUTED),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(status)), area);
}
