use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::theme;

/// One chip per event group: `[n] icon Label count`. Selected chips are
/// highlighted; the chip under the facet cursor is underlined.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let groups = app.timeline.groups();
    let filter = app.timeline.filter();

    let mut spans: Vec<Span> = vec![Span::styled(" Facets ", Style::default().fg(theme::TEXT_MUTED))];
    if groups.is_empty() {
        spans.push(Span::styled("none", Style::default().fg(theme::TEXT_MUTED)));
    }

    for (i, group) in groups.iter().enumerate() {
        let selected = filter.contains(&group.representative_type);
        let tone = theme::tone_color(group.tone);

        let mut style = if selected {
            Style::default()
                .fg(theme::BG_DARK)
                .bg(tone)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(tone)
        };
        if i == app.facet_cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        let shortcut = if i < 9 {
            format!("{} ", i + 1)
        } else {
            String::new()
        };
        spans.push(Span::styled(
            format!(" {}{} {} {} ", shortcut, group.icon, group.label, group.count),
            style,
        ));
        spans.push(Span::raw(" "));
    }

    if !filter.is_empty() {
        spans.push(Span::styled(
            format!(" {} selected (x to clear)", filter.len()),
            Style::default().fg(theme::TEXT_DIM),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}
