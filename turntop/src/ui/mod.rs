//! UI module root: exposes drawing functions for individual panels.

pub mod completions;
pub mod confirm;
pub mod filter_bar;
pub mod footer;
pub mod header;
pub mod prediction;
pub mod processes;
pub mod theme;
pub mod util;
