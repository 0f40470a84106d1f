//! Process table: one row per visible process, per-cell coloring, a `[kill]`
//! control per row, selection and a scrollbar.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::render::{View, PLACEHOLDER};
use crate::ui::theme::{cpu_color, HEADER_FG, KILL_FG, MUTED};
use crate::ui::util::{draw_scrollbar, inner};

// Shared by drawing and hit-testing so both agree on where columns are.
const COLS: [Constraint; 9] = [
    Constraint::Length(7),  // PID
    Constraint::Min(12),    // Name
    Constraint::Length(6),  // CPU %
    Constraint::Length(6),  // Mem %
    Constraint::Length(9),  // CPU s
    Constraint::Length(9),  // Pred TAT
    Constraint::Length(9),  // Actual TAT
    Constraint::Length(10), // Status
    Constraint::Length(6),  // [kill]
];
const KILL_COL: usize = 8;
const COL_SPACING: u16 = 1;

/// Area rows go in: inside the border, minus the scrollbar column.
fn content_area(area: Rect) -> Rect {
    let inner = inner(area);
    Rect {
        width: inner.width.saturating_sub(2),
        ..inner
    }
}

/// Data rows that fit under the header.
pub fn viewport_rows(area: Rect) -> usize {
    content_area(area).height.saturating_sub(1) as usize
}

/// Smallest scroll change that keeps `selected` on screen.
pub fn keep_visible(selected: usize, offset: usize, viewport: usize) -> usize {
    let viewport = viewport.max(1);
    if selected < offset {
        selected
    } else if selected >= offset + viewport {
        selected + 1 - viewport
    } else {
        offset
    }
}

pub fn draw_processes(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    view: &View,
    selected: usize,
    scroll_offset: usize,
) {
    let title = if view.rows.len() == view.total_items {
        format!("Processes ({})", view.total_items)
    } else {
        format!("Processes ({} of {})", view.rows.len(), view.total_items)
    };
    f.render_widget(Block::default().borders(Borders::ALL).title(title), area);

    let inner = inner(area);
    let content = content_area(area);
    if content.height < 1 || content.width < 3 {
        return;
    }

    let total_rows = view.rows.len();
    let viewport = viewport_rows(area);
    let offset = scroll_offset.min(total_rows.saturating_sub(viewport));

    let rows = view
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(viewport)
        .map(|(ix, r)| {
            let actual_style = if r.actual == PLACEHOLDER {
                Style::default().fg(MUTED)
            } else {
                Style::default()
            };
            let row = Row::new(vec![
                Cell::from(r.pid.map_or_else(|| PLACEHOLDER.to_string(), |p| p.to_string()))
                    .style(Style::default().fg(MUTED)),
                Cell::from(r.name.clone()),
                Cell::from(r.cpu_percent.clone()).style(Style::default().fg(cpu_color(r.cpu_value))),
                Cell::from(r.memory_percent.clone()),
                Cell::from(r.cpu_time.clone()),
                Cell::from(r.predicted.clone()),
                Cell::from(r.actual.clone()).style(actual_style),
                Cell::from(r.actual_hint.clone().unwrap_or_default())
                    .style(Style::default().fg(MUTED)),
                Cell::from(if r.kill.is_some() { "[kill]" } else { "" })
                    .style(Style::default().fg(KILL_FG)),
            ]);
            if ix == selected {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        });

    let header = Row::new(vec![
        "PID", "Name", "CPU %", "Mem %", "CPU s", "Pred TAT", "Actual", "Status", "",
    ])
    .style(Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .flex(Flex::Start)
        .column_spacing(COL_SPACING);
    f.render_widget(table, content);

    if total_rows == 0 {
        let hint = Rect {
            y: content.y + 1,
            height: 1,
            ..content
        };
        if hint.y < content.y + content.height {
            f.render_widget(
                ratatui::widgets::Paragraph::new("no matching processes")
                    .style(Style::default().fg(Color::DarkGray)),
                hint,
            );
        }
    }

    let scroll_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    draw_scrollbar(f, scroll_area, total_rows, viewport, offset);
}

/// Where a mouse press landed in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcHit {
    /// Index into the visible rows.
    pub row: usize,
    pub on_kill: bool,
}

/// Map a left click to a row. Returns None for the header, borders or empty space.
pub fn processes_hit(
    mouse: MouseEvent,
    area: Rect,
    scroll_offset: usize,
    total_rows: usize,
) -> Option<ProcHit> {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return None;
    }
    let content = content_area(area);
    let inside = mouse.column >= content.x
        && mouse.column < content.x + content.width
        && mouse.row > content.y // first line is the header
        && mouse.row < content.y + content.height;
    if !inside {
        return None;
    }
    let viewport = viewport_rows(area);
    let offset = scroll_offset.min(total_rows.saturating_sub(viewport));
    let row = offset + (mouse.row - content.y - 1) as usize;
    if row >= total_rows {
        return None;
    }
    let cols = Layout::horizontal(COLS)
        .flex(Flex::Start)
        .spacing(COL_SPACING)
        .split(content);
    let kill = cols[KILL_COL];
    let on_kill = mouse.column >= kill.x && mouse.column < kill.x + kill.width;
    Some(ProcHit { row, on_kill })
}
