//! Projects (snapshot, filter) onto the complete visible state.
//!
//! Every call builds a fresh [`View`]; nothing is patched in place, so a view
//! never carries bindings from an earlier snapshot.

use crate::actions::Terminate;
use crate::filter::{filter_items, FilterTerm};
use crate::types::{Completion, ProcessEntry, Snapshot};

/// Shown for any absent or non-finite number. Never "0" or "NaN".
pub const PLACEHOLDER: &str = "—";

/// Termination control for one rendered row. The pid is captured when the
/// row is built, so later re-filters or reflows cannot retarget it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillControl {
    pid: u32,
}

impl KillControl {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn activate(&self, target: &impl Terminate) {
        target.terminate(self.pid);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub pid: Option<u32>,
    pub name: String,
    pub cpu_percent: String,
    pub memory_percent: String,
    pub cpu_time: String,
    pub predicted: String,
    pub actual: String,
    /// Server annotation explaining the actual value (e.g. "running").
    pub actual_hint: Option<String>,
    // raw value kept for coloring only
    pub cpu_value: Option<f64>,
    /// `None` when the server sent no usable pid for the row.
    pub kill: Option<KillControl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionView {
    pub pid: u32,
    pub name: String,
    pub predicted: String,
    pub actual: String,
    pub error: String,
    pub error_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct View {
    pub summary: String,
    pub rows: Vec<RowView>,
    pub completions: Vec<CompletionView>,
    /// Items in the snapshot before filtering.
    pub total_items: usize,
}

pub fn fmt_num(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.decimals$}"),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn render(snapshot: Option<&Snapshot>, term: &FilterTerm) -> View {
    let Some(snap) = snapshot else {
        return View {
            summary: PLACEHOLDER.to_string(),
            ..View::default()
        };
    };

    View {
        summary: fmt_num(snap.system_prediction, 2),
        rows: filter_items(&snap.items, term)
            .into_iter()
            .map(row_view)
            .collect(),
        completions: snap.recent_completions.iter().map(completion_view).collect(),
        total_items: snap.items.len(),
    }
}

fn row_view(p: &ProcessEntry) -> RowView {
    RowView {
        pid: p.pid,
        name: p.name.clone(),
        cpu_percent: fmt_num(p.cpu_percent, 1),
        memory_percent: fmt_num(p.memory_percent, 1),
        cpu_time: fmt_num(p.cpu_time, 1),
        predicted: fmt_num(p.predicted_turnaround_time, 2),
        actual: fmt_num(p.actual_turnaround_time, 2),
        actual_hint: p.turnaround_status.clone(),
        cpu_value: p.cpu_percent,
        kill: p.pid.map(|pid| KillControl { pid }),
    }
}

fn completion_view(c: &Completion) -> CompletionView {
    let error = c.duration_error.or(match (c.actual_turnaround_time, c.predicted_turnaround_time) {
        (Some(a), Some(p)) => Some(a - p),
        _ => None,
    });
    CompletionView {
        pid: c.pid,
        name: c.name.clone(),
        predicted: fmt_num(c.predicted_turnaround_time, 2),
        actual: fmt_num(c.actual_turnaround_time, 2),
        error: match error {
            Some(e) if e.is_finite() => format!("{e:+.2}"),
            _ => PLACEHOLDER.to_string(),
        },
        error_value: error,
    }
}
