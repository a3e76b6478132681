use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::input::commands::COMMANDS;
use crate::theme;

pub fn render(frame: &mut Frame, area: Rect) {
    let mut lines = vec![];

    lines.push(Line::from(""));
    lines.push(section("Navigation"));
    lines.push(binding("j / k / Up / Down", "Move through the timeline"));
    lines.push(binding("gg / G", "Go to top / bottom"));
    lines.push(binding("Ctrl+D / Ctrl+U", "Page down / up"));
    lines.push(binding("Enter / Space", "Expand or collapse event"));

    lines.push(Line::from(""));
    lines.push(section("Facets"));
    lines.push(binding("h / l", "Move facet cursor"));
    lines.push(binding("f", "Toggle facet under cursor"));
    lines.push(binding("1 - 9", "Toggle facet by position"));
    lines.push(binding("x", "Clear all facets"));

    lines.push(Line::from(""));
    lines.push(section("Commands"));
    for cmd in COMMANDS {
        lines.push(command_line(cmd.name, cmd.description));
    }

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(binding("Ctrl+R", "Reload events"));
    lines.push(binding("?", "Toggle this help"));
    lines.push(binding("q", "Quit"));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));
    let modal_area = centered_rect(60, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::PURPLE))
        .title(" Help (? to close) ");

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, modal_area);
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(theme::PURPLE)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<22}", key), Style::default().fg(theme::YELLOW)),
        Span::styled(desc, Style::default().fg(theme::TEXT)),
    ])
}

fn command_line(name: &str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("    {:<22}", format!(":{}", name)),
            Style::default().fg(theme::YELLOW),
        ),
        Span::styled(desc, Style::default().fg(theme::TEXT)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}
