//! Filter input line.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::theme::MUTED;

pub fn draw_filter_bar(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    text: &str,
    editing: bool,
    shown: usize,
    total: usize,
) {
    let block = if editing {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Filter (Enter/Esc to finish)")
    } else {
        Block::default().borders(Borders::ALL).title("Filter")
    };

    let value = if editing {
        Span::styled(
            format!("{text}|"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    } else if text.is_empty() {
        Span::styled("press / to filter by name or pid", Style::default().fg(MUTED))
    } else {
        Span::styled(text.to_string(), Style::default().fg(Color::White))
    };

    let mut spans = vec![value];
    if !text.trim().is_empty() {
        spans.push(Span::styled(
            format!("  ({shown} of {total} match)"),
            Style::default().fg(MUTED),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
