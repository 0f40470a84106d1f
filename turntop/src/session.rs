//! Per-console client state: last snapshot, filter, connection status, and
//! the view rendered from them.
//!
//! All mutation goes through here, and every mutation re-renders from current
//! state, so an input edit and an inbound frame converge no matter which
//! arrives first.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::error::Result;
use crate::filter::FilterTerm;
use crate::history::push_capped;
use crate::render::{render, View};
use crate::types::Snapshot;
use crate::ws::ConnectionStatus;

/// Prediction samples kept for the trend sparkline.
pub const PREDICTION_HISTORY: usize = 120;

#[derive(Debug, Clone, Default)]
pub struct Session {
    last_snapshot: Option<Snapshot>,
    last_update: Option<DateTime<Local>>,
    filter_text: String,
    filter: FilterTerm,
    status: ConnectionStatus,
    prediction_hist: VecDeque<f64>,
    view: View,
}

impl Session {
    pub fn new() -> Self {
        let mut s = Self::default();
        s.rerender();
        s
    }

    /// Decode a frame and, only if it decodes, make it the current snapshot.
    /// On error nothing in the session changes.
    pub fn apply_frame(&mut self, text: &str) -> Result<()> {
        let snapshot = Snapshot::from_json(text)?;
        if let Some(p) = snapshot.system_prediction {
            push_capped(&mut self.prediction_hist, p, PREDICTION_HISTORY);
        }
        self.last_snapshot = Some(snapshot);
        self.last_update = Some(Local::now());
        self.rerender();
        Ok(())
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    /// Store the raw text as typed and re-render from the last snapshot.
    pub fn set_filter(&mut self, raw: &str) {
        self.filter_text = raw.to_string();
        self.filter = FilterTerm::new(raw);
        self.rerender();
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut raw = self.filter_text.clone();
        raw.push(c);
        self.set_filter(&raw);
    }

    pub fn pop_filter_char(&mut self) {
        let mut raw = self.filter_text.clone();
        raw.pop();
        self.set_filter(&raw);
    }

    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    fn rerender(&mut self) {
        self.view = render(self.last_snapshot.as_ref(), &self.filter);
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.last_update
    }

    pub fn filter(&self) -> &FilterTerm {
        &self.filter
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn prediction_history(&self) -> &VecDeque<f64> {
        &self.prediction_hist
    }

    /// Data on screen is older than the connection state suggests.
    pub fn is_stale(&self) -> bool {
        self.last_snapshot.is_some() && self.status != ConnectionStatus::Live
    }
}
