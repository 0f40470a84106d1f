//! Recently completed processes: predicted vs measured turnaround.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::render::CompletionView;
use crate::ui::theme::{HEADER_FG, MUTED};

const COLS: [Constraint; 5] = [
    Constraint::Length(7),  // PID
    Constraint::Min(12),    // Name
    Constraint::Length(9),  // Predicted
    Constraint::Length(9),  // Actual
    Constraint::Length(9),  // Error
];

fn error_color(e: Option<f64>) -> Color {
    match e.map(f64::abs) {
        Some(x) if x < 1.0 => Color::Green,
        Some(x) if x < 5.0 => Color::Yellow,
        Some(_) => Color::Red,
        None => MUTED,
    }
}

pub fn draw_completions(f: &mut ratatui::Frame<'_>, area: Rect, completions: &[CompletionView]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Recent completions ({})", completions.len()));

    // newest last on the wire; show newest first
    let rows = completions.iter().rev().map(|c| {
        Row::new(vec![
            Cell::from(c.pid.to_string()).style(Style::default().fg(MUTED)),
            Cell::from(c.name.clone()),
            Cell::from(c.predicted.clone()),
            Cell::from(c.actual.clone()),
            Cell::from(c.error.clone()).style(Style::default().fg(error_color(c.error_value))),
        ])
    });
    let header = Row::new(vec!["PID", "Name", "Pred", "Actual", "Error"])
        .style(Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD));
    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .column_spacing(1)
        .block(block);
    f.render_widget(table, area);
}
