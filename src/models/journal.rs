use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One session block from the append-only journal.
///
/// Blocks start with `### Session: <timestamp>`; the body is bullet lists
/// under bold field labels. Timestamps come in several hand-written formats,
/// so an entry may carry none at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub topic: Option<String>,
    pub accomplished: Vec<String>,
    pub next_steps: Vec<String>,
    pub blockers: Vec<String>,
    /// Any other `**Key**: value` lines in the block.
    pub metadata: BTreeMap<String, String>,
}

impl JournalEntry {
    /// Whether any field of this entry mentions the given feature id.
    pub fn mentions(&self, feature_id: &str) -> bool {
        self.topic.as_deref().is_some_and(|t| t.contains(feature_id))
            || self
                .accomplished
                .iter()
                .chain(self.next_steps.iter())
                .chain(self.blockers.iter())
                .any(|line| line.contains(feature_id))
            || self.metadata.values().any(|v| v.contains(feature_id))
    }
}
