//! Activity-window staleness checks.

use anyhow::Result;
use chrono::Duration;

use crate::models::{DriftIssue, FeatureStatus, IssueKind};
use crate::readers::Snapshot;

use super::{Check, Needs};

/// An in-progress feature with no trace of recent activity: no commit
/// mentions its id inside the window, the status document does not mention
/// it, and no journal session in the window touched it.
pub struct StaleInProgressCheck;

impl Check for StaleInProgressCheck {
    fn name(&self) -> &'static str {
        "stale_in_progress"
    }

    fn needs(&self) -> Needs {
        Needs {
            registry: true,
            repo: true,
            ..Default::default()
        }
    }

    fn supports_fix(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let Some(repo) = snapshot.repo.as_ref() else {
            return Ok(Vec::new());
        };
        let days = snapshot.config.stale_feature_days;
        let cutoff = snapshot.now - Duration::days(days);
        let mut issues = Vec::new();

        for feature in snapshot.features() {
            if feature.status != FeatureStatus::InProgress {
                continue;
            }

            let committed = repo
                .commits_since(cutoff)
                .any(|c| c.message.contains(&feature.id));
            if committed {
                continue;
            }
            if snapshot
                .status_doc
                .as_ref()
                .is_some_and(|doc| doc.mentions(&feature.id))
            {
                continue;
            }
            let journaled = snapshot.journal.iter().any(|entry| {
                entry.timestamp.is_some_and(|t| t >= cutoff) && entry.mentions(&feature.id)
            });
            if journaled {
                continue;
            }

            issues.push(
                DriftIssue::new(
                    IssueKind::StaleInProgress,
                    format!(
                        "{}: in_progress but no commit, status entry, or journal session has touched it in {} days",
                        feature.id, days
                    ),
                )
                .with_feature(&feature.id)
                .with_extra("window_days", days),
            );
        }

        Ok(issues)
    }
}

/// The status document's focus should show up in recent commit messages.
/// Silence over the whole window means the document has fallen behind.
pub struct StatusFocusStalenessCheck;

impl Check for StatusFocusStalenessCheck {
    fn name(&self) -> &'static str {
        "status_focus_staleness"
    }

    fn needs(&self) -> Needs {
        Needs {
            status_doc: true,
            repo: true,
            ..Default::default()
        }
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let (Some(repo), Some(doc)) = (snapshot.repo.as_ref(), snapshot.status_doc.as_ref())
        else {
            return Ok(Vec::new());
        };
        let days = snapshot.config.focus_window_days;
        let cutoff = snapshot.now - Duration::days(days);

        let keywords = doc.focus_keywords();
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let recent: Vec<String> = repo
            .commits_since(cutoff)
            .map(|c| c.message.to_lowercase())
            .collect();
        // Nothing committed in the window: no signal to correlate against.
        if recent.is_empty() {
            return Ok(Vec::new());
        }

        let matched = keywords
            .iter()
            .any(|kw| recent.iter().any(|msg| msg.contains(kw)));
        if matched {
            return Ok(Vec::new());
        }

        Ok(vec![DriftIssue::new(
            IssueKind::StaleFocus,
            format!(
                "STATUS.md focus \"{}\" does not match any commit message from the last {} days",
                doc.focus.as_deref().unwrap_or(""),
                days
            ),
        )
        .with_file("STATUS.md")
        .with_extra("window_days", days)])
    }
}
