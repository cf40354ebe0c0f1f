use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The acceptance checklist for one feature.
///
/// One file per feature under `spec/acceptance/F-####.md`, optional. A
/// shipped feature is expected to have every criterion checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptanceDoc {
    pub feature_id: String,
    pub path: PathBuf,
    pub criteria: Vec<Criterion>,
}

/// A single checklist line, matched by the `- [ ]` / `- [x]` checkbox pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub text: String,
    pub checked: bool,
}

impl AcceptanceDoc {
    pub fn total(&self) -> usize {
        self.criteria.len()
    }

    pub fn complete(&self) -> usize {
        self.criteria.iter().filter(|c| c.checked).count()
    }

    /// Completion percentage, rounded down. Zero criteria is zero percent —
    /// callers guarding against empty checklists must test `total()` first.
    pub fn completion_pct(&self) -> u32 {
        if self.criteria.is_empty() {
            return 0;
        }
        (self.complete() * 100 / self.total()) as u32
    }

    pub fn unchecked(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter().filter(|c| !c.checked)
    }
}
