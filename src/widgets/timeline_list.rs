use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;

use crate::app::{App, LoadState};
use crate::describe::{DetailBlock, TextBody};
use crate::text::Segment;
use crate::theme;
use crate::timeline::RenderRecord;

const INDENT: &str = "    ";

pub const EMPTY_MESSAGE: &str = "No activity";
pub const NO_MATCHES_MESSAGE: &str = "No events match the selected filters";

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let records = app.timeline.records(Utc::now());

    if records.is_empty() {
        let message = match &app.load_state {
            LoadState::NotLoaded | LoadState::Loading if app.timeline.events().is_empty() => {
                "Loading events..."
            }
            _ if app.timeline.no_matches() => NO_MATCHES_MESSAGE,
            _ => EMPTY_MESSAGE,
        };
        let placeholder = Paragraph::new(format!(" {}", message))
            .style(Style::default().fg(theme::TEXT_MUTED));
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = records.iter().map(record_item).collect();
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn record_item(record: &RenderRecord) -> ListItem<'static> {
    let tone = theme::tone_color(record.tone);
    let mut header = vec![
        Span::styled(format!("{} ", record.icon), Style::default().fg(tone)),
        Span::styled(
            format!("{:<14}", record.label),
            Style::default().fg(tone).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", record.actor),
            Style::default().fg(theme::CYAN),
        ),
        Span::styled(record.description.clone(), Style::default().fg(theme::TEXT)),
        Span::styled(
            format!("  {}", record.relative_date),
            Style::default().fg(theme::TEXT_MUTED),
        ),
    ];
    if record.needs_expansion {
        let marker = if record.is_expanded { "  [-]" } else { "  [+]" };
        header.push(Span::styled(marker, Style::default().fg(theme::PURPLE_DIM)));
    }

    let mut lines = vec![Line::from(header)];
    for block in &record.detail_blocks {
        lines.extend(block_lines(block, record.is_expanded));
    }
    ListItem::new(lines)
}

fn block_lines(block: &DetailBlock, expanded: bool) -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme::TEXT_DIM);
    match block {
        DetailBlock::Commits {
            commits,
            total,
            expandable,
        } => {
            let mut lines: Vec<Line> = commits
                .iter()
                .map(|commit| {
                    let mut spans = vec![
                        Span::raw(INDENT),
                        Span::styled(format!("{} ", commit.sha), Style::default().fg(theme::YELLOW)),
                    ];
                    spans.extend(segment_spans(&commit.message, dim));
                    if let Some(author) = &commit.author {
                        spans.push(Span::styled(
                            format!("  ({})", author),
                            Style::default().fg(theme::TEXT_MUTED),
                        ));
                    }
                    Line::from(spans)
                })
                .collect();
            let hidden = total.saturating_sub(commits.len());
            if *expandable && !expanded && hidden > 0 {
                lines.push(Line::from(Span::styled(
                    format!("{}… {} more commit(s)", INDENT, hidden),
                    Style::default().fg(theme::TEXT_MUTED),
                )));
            }
            lines
        }
        DetailBlock::Comment { body } => body_lines(body, dim),
        DetailBlock::Review { state, body } => {
            let mut lines = Vec::new();
            if let Some(state) = state {
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(state.to_lowercase(), Style::default().fg(theme::GREEN)),
                ]));
            }
            if let Some(body) = body {
                lines.extend(body_lines(body, dim));
            }
            lines
        }
        DetailBlock::Subject {
            subject,
            number,
            title,
            body,
        } => {
            let number = number.map(|n| format!(" #{}", n)).unwrap_or_default();
            let mut lines = vec![Line::from(vec![
                Span::raw(INDENT),
                Span::styled(
                    format!("{}{} ", subject.as_str(), number),
                    Style::default().fg(theme::TEXT_MUTED),
                ),
                Span::styled(title.clone(), Style::default().fg(theme::TEXT)),
            ])];
            if let Some(body) = body {
                lines.extend(body_lines(body, dim));
            }
            lines
        }
        DetailBlock::Release { name, body } => {
            let mut lines = Vec::new();
            if !name.is_empty() {
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(name.clone(), Style::default().fg(theme::MAGENTA)),
                ]));
            }
            if let Some(body) = body {
                lines.extend(body_lines(body, dim));
            }
            lines
        }
    }
}

/// Lay out body segments, breaking at embedded newlines.
fn body_lines(body: &TextBody, style: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span> = vec![Span::raw(INDENT)];
    for segment in &body.segments {
        match segment {
            Segment::Text { text } => {
                let mut parts = text.split('\n');
                if let Some(first) = parts.next() {
                    if !first.is_empty() {
                        current.push(Span::styled(first.to_string(), style));
                    }
                }
                for part in parts {
                    lines.push(Line::from(std::mem::replace(
                        &mut current,
                        vec![Span::raw(INDENT)],
                    )));
                    if !part.is_empty() {
                        current.push(Span::styled(part.to_string(), style));
                    }
                }
            }
            Segment::Link { display, .. } => current.push(link_span(display)),
        }
    }
    lines.push(Line::from(current));
    lines
}

fn segment_spans(segments: &[Segment], style: Style) -> Vec<Span<'static>> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { text } => Span::styled(text.clone(), style),
            Segment::Link { display, .. } => link_span(display),
        })
        .collect()
}

fn link_span(display: &str) -> Span<'static> {
    Span::styled(
        display.to_string(),
        Style::default()
            .fg(theme::LINK)
            .add_modifier(Modifier::UNDERLINED),
    )
}
