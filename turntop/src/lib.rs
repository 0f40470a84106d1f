//! turntop: live console for a remote turnaround-predicting process scheduler.
//!
//! The library holds everything but terminal bootstrap so the sync/filter/render
//! pipeline can be driven from tests without a terminal or a real server.

pub mod actions;
pub mod app;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod history;
pub mod profiles;
pub mod render;
pub mod session;
pub mod types;
pub mod ui;
pub mod ws;

pub use error::{ConsoleError, Result};
