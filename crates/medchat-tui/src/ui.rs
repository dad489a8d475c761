use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use medchat_core::Sender;

use crate::app::App;

const INPUT_PLACEHOLDER: &str = "Ask a medical question...";

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(
                    bold_text,
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
                if found_close {
                    current_text.push_str("**");
                }
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

/// Split a line into words, keeping the style of every character so bold
/// text survives wrapping
fn words_of(line: &Line) -> Vec<Vec<(char, Style)>> {
    let mut words = Vec::new();
    let mut current = Vec::new();

    for span in &line.spans {
        for c in span.content.chars() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                current.push((c, span.style));
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn push_char(spans: &mut Vec<Span<'static>>, c: char, style: Style) {
    match spans.last_mut() {
        Some(span) if span.style == style => span.content.to_mut().push(c),
        _ => spans.push(Span::styled(c.to_string(), style)),
    }
}

/// Greedy word wrap to `width` columns. Runs of whitespace collapse to one
/// space and words wider than the pane are broken across lines.
fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![line.clone()];
    }

    let words = words_of(line);
    if words.is_empty() {
        return vec![Line::default()];
    }

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_len = 0;

    for word in words {
        if current_len > 0 {
            if current_len + 1 + word.len() <= width {
                push_char(&mut spans, ' ', Style::default());
                current_len += 1;
            } else {
                lines.push(Line::from(std::mem::take(&mut spans)));
                current_len = 0;
            }
        }

        for (c, style) in word {
            if current_len == width {
                lines.push(Line::from(std::mem::take(&mut spans)));
                current_len = 0;
            }
            push_char(&mut spans, c, style);
            current_len += 1;
        }
    }

    if !spans.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

/// Every line of the chat pane, already wrapped to `width`. The scroll
/// maths in [`App`] counts these same lines.
pub fn chat_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    for entry in app.entries() {
        lines.push(sender_line(entry.sender()));
        for text in entry.text().lines() {
            let line = match entry.sender() {
                Sender::User => Line::from(text.to_string()),
                Sender::Bot => parse_markdown_line(text),
            };
            lines.extend(wrap_line(&line, width));
        }
        lines.push(Line::default());
    }

    if app.is_pending() {
        lines.push(sender_line(Sender::Bot));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Bot is thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Medical Chatbot ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.endpoint.clone(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn sender_line(sender: Sender) -> Line<'static> {
    let (label, color) = match sender {
        Sender::User => ("You:", Color::Cyan),
        Sender::Bot => ("Bot:", Color::Yellow),
    };
    Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);
    // Inner size minus borders, for scroll calculations
    let height = area.height.saturating_sub(2);
    let width = area.width.saturating_sub(2);
    if (height, width) != (app.chat_height, app.chat_width) {
        app.chat_height = height;
        app.chat_width = width;
        app.scroll_to_bottom();
    }

    let lines = chat_lines(app, width as usize);

    let title = match app.controller.in_flight() {
        0 | 1 => " Chat ".to_string(),
        n => format!(" Chat ({} waiting) ", n),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Ask (Enter to send) ");

    let input = app.controller.input();

    // Horizontal scrolling keeps the cursor inside the box
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = input.cursor();
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let paragraph = if input.as_str().is_empty() {
        Paragraph::new(INPUT_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        let visible_text: String = input
            .as_str()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(paragraph.block(input_block), area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mode = if app.is_pending() {
        Span::styled(" WAITING ", Style::default().bg(Color::Yellow).fg(Color::Black))
    } else {
        Span::styled(" CHAT ", Style::default().bg(Color::Blue).fg(Color::White))
    };

    let mut spans = vec![mode, Span::raw(" ")];
    spans.extend(vec![
        Span::styled(" Enter ", key_style),
        Span::styled(" send ", label_style),
        Span::styled(" PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
