//! Operator filter: case-insensitive substring match on process name or pid.

use crate::types::ProcessEntry;

/// Normalized (trimmed, lowercased) filter text. Empty means "no filter".
///
/// Normalization happens once per edit, not once per matched row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterTerm(String);

impl FilterTerm {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, entry: &ProcessEntry) -> bool {
        if self.0.is_empty() {
            return true;
        }
        // a missing pid matches as the empty string
        let pid = entry.pid.map(|p| p.to_string()).unwrap_or_default();
        entry.name.to_lowercase().contains(&self.0) || pid.contains(&self.0)
    }
}

/// Subsequence of `items` that match `term`, in delivered order.
pub fn filter_items<'a>(items: &'a [ProcessEntry], term: &FilterTerm) -> Vec<&'a ProcessEntry> {
    items.iter().filter(|p| term.matches(p)).collect()
}
