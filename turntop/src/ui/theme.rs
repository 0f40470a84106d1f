//! Shared UI theme constants.

use ratatui::style::Color;

use crate::ws::ConnectionStatus;

// Scrollbar colors
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub const MUTED: Color = Color::DarkGray;
pub const HEADER_FG: Color = Color::Cyan;
pub const KILL_FG: Color = Color::Red;

pub fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Live => Color::Green,
        ConnectionStatus::Connecting => Color::Yellow,
        ConnectionStatus::Error => Color::Red,
        ConnectionStatus::Reconnecting => Color::Magenta,
    }
}

pub fn cpu_color(v: Option<f64>) -> Color {
    match v {
        Some(x) if x < 25.0 => Color::Green,
        Some(x) if x < 60.0 => Color::Yellow,
        Some(_) => Color::Red,
        None => MUTED,
    }
}
