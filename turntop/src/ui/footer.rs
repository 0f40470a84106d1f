//! Key hints and the last termination request sent.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::MUTED;

pub fn draw_footer(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    last_dispatch: Option<(u32, DateTime<Local>)>,
) {
    let mut spans = vec![Span::styled(
        "q quit  / filter  c clear  ↑↓ select  x kill",
        Style::default().fg(MUTED),
    )];
    if let Some((pid, at)) = last_dispatch {
        spans.push(Span::raw(format!(
            "  |  kill sent for PID {pid} at {}",
            at.format("%H:%M:%S")
        )));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
