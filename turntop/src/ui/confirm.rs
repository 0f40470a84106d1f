//! Centered termination confirmation popup.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::ui::theme::{KILL_FG, MUTED};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn draw_confirm(f: &mut ratatui::Frame<'_>, area: Rect, pid: u32, name: &str) {
    let popup = centered(area, 48, 5);
    let lines = vec![
        Line::from(vec![
            Span::raw("Terminate PID "),
            Span::styled(
                pid.to_string(),
                Style::default().fg(KILL_FG).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" ({name})?")),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y/Enter = terminate, any other key = cancel",
            Style::default().fg(MUTED),
        )),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Confirm"),
        ),
        popup,
    );
}
