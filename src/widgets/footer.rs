use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Command => &[("Esc", "cancel"), ("Tab", "complete"), ("Enter", "execute")],
        InputMode::PendingG => &[("g", "top")],
        InputMode::Normal => &[
            ("j/k", "nav"),
            ("Enter", "expand"),
            ("h/l", "facet"),
            ("f", "toggle"),
            ("1-9", "facet #"),
            ("x", "clear"),
            (":", "cmd"),
            ("?", "help"),
            ("q", "quit"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme::PURPLE)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}
