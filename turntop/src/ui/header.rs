//! Top header: endpoint, live-channel status, echoed quantum and freshness.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

use crate::session::Session;
use crate::ui::theme::{status_color, MUTED};
use crate::ui::util::truncate_middle;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, session: &Session, authority: &str) {
    let status = session.status();
    let mut spans = vec![
        Span::raw(format!("turntop — {} | ", truncate_middle(authority, 40))),
        Span::styled(
            format!("● {}", status.label()),
            Style::default()
                .fg(status_color(status))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if session.is_stale() {
        spans.push(Span::styled(
            " (stale)",
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(snap) = session.last_snapshot() {
        if let Some(q) = snap.quantum {
            spans.push(Span::raw(format!(" | quantum {q}")));
        }
        let count = snap.count.unwrap_or(snap.items.len() as u64);
        spans.push(Span::raw(format!(" | {count} procs")));
    }
    match session.last_update() {
        Some(ts) => spans.push(Span::styled(
            format!(" | updated {}", ts.format("%H:%M:%S")),
            Style::default().fg(MUTED),
        )),
        None => spans.push(Span::styled(
            " | waiting for first snapshot",
            Style::default().fg(MUTED),
        )),
    }
    f.render_widget(
        Block::default()
            .title(Line::from(spans))
            .borders(Borders::BOTTOM),
        area,
    );
}
