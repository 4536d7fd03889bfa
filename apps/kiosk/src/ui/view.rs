//! UI rendering

use pricecheck_core::AppStatus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tokio::time::Instant;

use super::app::KioskApp;

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &KioskApp, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(7),    // Result view
            Constraint::Length(1), // Countdown badge
            Constraint::Length(3), // Scanner input
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0]);
    render_body(frame, app, now, chunks[1]);
    render_countdown(frame, app, now, chunks[2]);
    render_input(frame, app, now, chunks[3]);
    render_hints(frame, chunks[4]);
}

fn render_title(frame: &mut Frame, app: &KioskApp, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        app.title.as_str(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

/// One of the five result views, centered in the body.
fn render_body(frame: &mut Frame, app: &KioskApp, now: Instant, area: Rect) {
    let snapshot = &app.snapshot.session;
    let code = snapshot.last_scanned_code.as_deref().unwrap_or_default();
    let dim = Style::default().fg(Color::DarkGray);

    let (border_color, lines) = match snapshot.status {
        AppStatus::Idle => (
            Color::DarkGray,
            vec![
                Line::from(Span::styled(
                    "Scan a product",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Point the scanner at the barcode to see its price",
                    dim,
                )),
            ],
        ),
        AppStatus::Loading => {
            let spinner = app
                .loading_since
                .map(|started| spinner_frame(started, now))
                .unwrap_or("⠋");
            (
                Color::Blue,
                vec![
                    Line::from(vec![
                        Span::styled(spinner, Style::default().fg(Color::Blue)),
                        Span::raw(" Searching product..."),
                    ]),
                    Line::from(""),
                    Line::from(Span::styled(format!("Code: {}", code), dim)),
                ],
            )
        }
        AppStatus::Success => match &snapshot.product {
            Some(product) => (
                Color::Green,
                vec![
                    Line::from(Span::styled(
                        product.name.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    category_badge(&product.category),
                    Line::from(""),
                    Line::from(Span::styled(
                        product.price.format_with_symbol(&app.currency_symbol),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(format!("Code: {}", product.code), dim)),
                ],
            ),
            None => (Color::Green, Vec::new()),
        },
        AppStatus::NotFound => (
            Color::Yellow,
            vec![
                Line::from(Span::styled(
                    "Product not found",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Code: {}", code)),
                Line::from(Span::styled(
                    "Please ask a store employee for help",
                    dim,
                )),
            ],
        ),
        AppStatus::Error => (
            Color::Red,
            vec![
                Line::from(Span::styled(
                    "System error",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from("The price could not be checked. Please try again."),
                Line::from(Span::styled(format!("Code: {}", code), dim)),
            ],
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Vertically center the content
    let content_height = lines.len() as u16;
    let top = inner.height.saturating_sub(content_height) / 2;
    let content_area = Rect {
        x: inner.x,
        y: inner.y + top,
        width: inner.width,
        height: inner.height.saturating_sub(top),
    };

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, content_area);
}

/// Category shown as a badge under the product name.
fn category_badge(category: &str) -> Line<'_> {
    let label = if category.trim().is_empty() {
        "Available item"
    } else {
        category
    };
    Line::from(vec![
        Span::styled("[ ", Style::default().fg(Color::DarkGray)),
        Span::styled(label, Style::default().fg(Color::Cyan)),
        Span::styled(" ]", Style::default().fg(Color::DarkGray)),
    ])
}

fn render_countdown(frame: &mut Frame, app: &KioskApp, now: Instant, area: Rect) {
    if !app.status().is_terminal() {
        return;
    }
    if let Some(secs) = app.snapshot.seconds_until_reset(now) {
        let badge = Paragraph::new(Line::from(vec![
            Span::styled("[ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("New lookup available in {}s", secs),
                Style::default().fg(Color::Blue).add_modifier(Modifier::DIM),
            ),
            Span::styled(" ]", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(badge, area);
    }
}

/// Render the scanner input (thick bar on left, block cursor when focused)
fn render_input(frame: &mut Frame, app: &KioskApp, now: Instant, area: Rect) {
    let border_color = if app.focus.has_focus() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Scanner ");

    let line = if app.pulse_active(now) {
        Line::from(Span::styled(
            "✓ Code detected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    } else if !app.input_enabled() {
        Line::from(Span::styled(
            "Searching...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        input_line(app)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn input_line(app: &KioskApp) -> Line<'_> {
    let focused = app.focus.has_focus();
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);
    let hint_style = Style::default().fg(Color::DarkGray);

    // Without focus the buffer is still shown, minus the cursor
    if !focused {
        let mut spans = vec![Span::styled("▌ ", hint_style)];
        if !app.input.is_empty() {
            spans.push(Span::styled(app.input.text.as_str(), text_style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("(click here to resume scanning)", hint_style));
        return Line::from(spans);
    }

    // Split the input at cursor position
    let (before, after) = app.input.text.split_at(app.input.cursor);
    let cursor_char = after.chars().next();
    let after_cursor = cursor_char.map_or("", |c| &after[c.len_utf8()..]);

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::Yellow))];

    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }

    match cursor_char {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", text_style)),
    }

    if !after_cursor.is_empty() {
        spans.push(Span::styled(after_cursor, text_style));
    }

    if app.input.is_empty() {
        spans.push(Span::styled(
            " waiting for scan",
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" look up  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" quit", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(hints, area);
}

fn spinner_frame(started_at: Instant, now: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = now.saturating_duration_since(started_at).as_millis() / 80;
    let idx = (elapsed as usize) % FRAMES.len();
    FRAMES[idx]
}
