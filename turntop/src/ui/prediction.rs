//! System prediction summary with an in-memory trend sparkline.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
};

use crate::history::{sparkline_points, window_peak};
use crate::render::PLACEHOLDER;
use crate::session::Session;
use crate::ui::theme::MUTED;

pub fn draw_prediction(f: &mut ratatui::Frame<'_>, area: Rect, session: &Session) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(area);

    let summary = &session.view().summary;
    let value_style = if summary == PLACEHOLDER {
        Style::default().fg(MUTED)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let lines = vec![
        Line::from(Span::styled(summary.clone(), value_style)),
        Line::from(Span::styled(
            "predicted turnaround (s)",
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("System prediction"),
        ),
        cols[0],
    );

    let hist = session.prediction_history();
    let width = cols[1].width.saturating_sub(2) as usize;
    let data = sparkline_points(hist, width);
    let title = match window_peak(hist, width) {
        Some(peak) => format!("Trend (peak {peak:.2})"),
        None => "Trend".into(),
    };
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(spark, cols[1]);
}
