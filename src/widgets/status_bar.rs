use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, LoadState};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " etrace ",
            Style::default()
                .fg(theme::PURPLE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            app.source_name.as_str(),
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
        ),
    ];

    let stats = &app.stats;
    if let Some(repo) = &stats.most_active_repository {
        left_spans.push(Span::styled("  most active ", Style::default().fg(theme::TEXT_MUTED)));
        left_spans.push(Span::styled(repo.as_str(), Style::default().fg(theme::TEXT_DIM)));
    }
    if stats.streak_days > 0 {
        left_spans.push(Span::styled(
            format!("  streak {}d", stats.streak_days),
            Style::default().fg(theme::GREEN),
        ));
    }

    let mut right_spans: Vec<Span> = Vec::new();

    let load_indicator = match &app.load_state {
        LoadState::Loaded => Span::styled("● Loaded", Style::default().fg(theme::GREEN)),
        LoadState::Loading => Span::styled("◌ Loading...", Style::default().fg(theme::YELLOW)),
        LoadState::NotLoaded => Span::styled("○ Not loaded", Style::default().fg(theme::TEXT_MUTED)),
        LoadState::Error(_) => Span::styled("✗ Load failed", Style::default().fg(theme::RED)),
    };
    right_spans.push(load_indicator);

    let shown = app.visible_len();
    let count = if shown == stats.total_events {
        format!("  [{} events, {} repos]", stats.total_events, stats.distinct_repos)
    } else {
        format!(
            "  [{}/{} events, {} repos]",
            shown, stats.total_events, stats.distinct_repos
        )
    };
    right_spans.push(Span::styled(count, Style::default().fg(theme::TEXT_MUTED)));

    if let Some(last) = stats.last_activity {
        right_spans.push(Span::styled(
            format!("  last {}", last.format("%Y-%m-%d %H:%M")),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    right_spans.push(Span::raw(" "));

    // Calculate widths and fill gap with spaces
    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
