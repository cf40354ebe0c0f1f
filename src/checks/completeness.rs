//! Registry-versus-acceptance completeness checks.

use anyhow::Result;

use crate::models::{DriftIssue, FeatureStatus, IssueKind};
use crate::readers::Snapshot;

use super::{Check, Needs};

/// A shipped feature must have every acceptance criterion checked.
///
/// Features with an empty (or absent) checklist never fire: nothing was
/// promised, so nothing is incomplete.
pub struct ShippedCompletenessCheck;

impl Check for ShippedCompletenessCheck {
    fn name(&self) -> &'static str {
        "shipped_completeness"
    }

    fn needs(&self) -> Needs {
        Needs {
            registry: true,
            acceptance: true,
            ..Default::default()
        }
    }

    fn supports_fix(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let mut issues = Vec::new();

        for feature in snapshot.features() {
            if feature.status != FeatureStatus::Shipped {
                continue;
            }
            let Some(doc) = snapshot.acceptance_for(&feature.id) else {
                continue;
            };
            if doc.total() == 0 || doc.complete() == doc.total() {
                continue;
            }

            let remaining = doc.total() - doc.complete();
            let named: Vec<String> = doc
                .unchecked()
                .map(|c| format!("\"{}\"", c.text))
                .collect();
            issues.push(
                DriftIssue::new(
                    IssueKind::IncompleteShipped,
                    format!(
                        "{}: shipped but {} of {} acceptance criteria unchecked: {}",
                        feature.id,
                        remaining,
                        doc.total(),
                        named.join(", ")
                    ),
                )
                .with_feature(&feature.id)
                .with_file(snapshot.rel_path(&doc.path))
                .with_extra("total", doc.total())
                .with_extra("complete", doc.complete()),
            );
        }

        Ok(issues)
    }
}

/// A feature still marked planned whose checklist is mostly done has drifted:
/// work started without the registry being told.
pub struct PendingButActiveCheck;

impl Check for PendingButActiveCheck {
    fn name(&self) -> &'static str {
        "pending_but_active"
    }

    fn needs(&self) -> Needs {
        Needs {
            registry: true,
            acceptance: true,
            ..Default::default()
        }
    }

    fn supports_fix(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let threshold = snapshot.config.completion_threshold;
        let mut issues = Vec::new();

        for feature in snapshot.features() {
            if feature.status != FeatureStatus::Planned {
                continue;
            }
            let Some(doc) = snapshot.acceptance_for(&feature.id) else {
                continue;
            };
            if doc.total() == 0 {
                continue;
            }
            let completion = doc.completion_pct();
            if completion < threshold {
                continue;
            }

            issues.push(
                DriftIssue::new(
                    IssueKind::StatusDrift,
                    format!(
                        "{}: status is 'planned' but acceptance criteria are {}% complete",
                        feature.id, completion
                    ),
                )
                .with_feature(&feature.id)
                .with_file(snapshot.rel_path(&doc.path))
                .with_extra("completion", completion),
            );
        }

        Ok(issues)
    }
}
