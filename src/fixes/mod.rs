//! The fix policy engine.
//!
//! Every issue kind is pre-classified: SAFE kinds are deterministic,
//! version-control-reversible, single-field edits and may be applied without
//! asking; interactive kinds need a human decision from an enumerated option
//! set; everything else is report-only. The policy produces three-valued
//! [`FixDecision`]s — the orchestrator supplies them from the run mode or
//! from a [`Prompter`], keeping policy separate from I/O.
//!
//! All artifact mutations are write-temp-then-rename, so an interrupted run
//! never leaves an artifact half-written.

use std::io::Write as _;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ArtifactError;
use crate::models::{DriftIssue, FeatureStatus, IssueKind};
use crate::readers::{acceptance, registry};
use crate::repo::RepoView;

/// How a run is allowed to touch artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Report only, never mutate.
    Check,
    /// Prompt per issue class, apply the chosen action.
    Interactive,
    /// Apply SAFE-classified kinds without asking; report the rest.
    Full,
}

/// Pre-classified repair posture of an issue kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Interactive,
    ReportOnly,
}

pub fn classify(kind: IssueKind) -> Safety {
    match kind {
        IssueKind::UntrackedFile | IssueKind::HookPath => Safety::Safe,
        IssueKind::IncompleteShipped
        | IssueKind::StatusDrift
        | IssueKind::StaleInProgress
        | IssueKind::OrphanedAcceptance => Safety::Interactive,
        // doc_drift is permanently advisory; the rest have no mechanical fix.
        _ => Safety::ReportOnly,
    }
}

/// A concrete, single-field mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixAction {
    /// Stage the issue's file in the index.
    StageFile,
    /// Point `core.hooksPath` at the repository hooks directory.
    SetHooksPath,
    /// Check every criterion in the acceptance file (code is authoritative).
    MarkCriteriaComplete,
    /// Registry status: planned -> in_progress.
    PromoteToInProgress,
    /// Registry status: in_progress -> paused.
    MarkPaused,
}

impl FixAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::StageFile => "stage the file",
            Self::SetHooksPath => "set core.hooksPath to the hooks directory",
            Self::MarkCriteriaComplete => "mark all acceptance criteria complete",
            Self::PromoteToInProgress => "set status to in_progress",
            Self::MarkPaused => "set status to paused",
        }
    }
}

/// The enumerated option set for an issue kind. Empty for kinds whose only
/// resolutions are skip and escalate (deleting content is never offered).
pub fn actions_for(kind: IssueKind) -> &'static [FixAction] {
    match kind {
        IssueKind::UntrackedFile => &[FixAction::StageFile],
        IssueKind::HookPath => &[FixAction::SetHooksPath],
        IssueKind::IncompleteShipped => &[FixAction::MarkCriteriaComplete],
        IssueKind::StatusDrift => &[FixAction::PromoteToInProgress],
        IssueKind::StaleInProgress => &[FixAction::MarkPaused],
        _ => &[],
    }
}

/// One decision per issue: apply a chosen action, leave it alone, or hand it
/// to a human outside this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixDecision {
    Apply(FixAction),
    Skip,
    Escalate,
}

/// Source of interactive decisions. The orchestrator never reads stdin
/// itself; it asks whatever prompter it was handed.
pub trait Prompter {
    fn choose(&mut self, issue: &DriftIssue, options: &[FixAction]) -> FixDecision;
}

/// Interactive prompter on the controlling terminal. Prompts go to stderr so
/// stdout stays clean for report output.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn choose(&mut self, issue: &DriftIssue, options: &[FixAction]) -> FixDecision {
        eprintln!("\n{} {}", issue.kind.as_str(), issue.description);
        for (i, action) in options.iter().enumerate() {
            eprintln!("  [{}] {}", i + 1, action.label());
        }
        eprintln!("  [s] skip   [e] escalate");
        eprint!("> ");
        let _ = std::io::stderr().flush();

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_err() {
            return FixDecision::Skip;
        }
        match line.trim() {
            "e" => FixDecision::Escalate,
            "s" | "" => FixDecision::Skip,
            choice => choice
                .parse::<usize>()
                .ok()
                .and_then(|n| options.get(n.checked_sub(1)?))
                .map(|action| FixDecision::Apply(*action))
                .unwrap_or(FixDecision::Skip),
        }
    }
}

/// Prompter answering from a pre-recorded queue. Used by tests and by
/// non-terminal runs that still want interactive-mode semantics.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    pub decisions: std::collections::VecDeque<FixDecision>,
}

impl ScriptedPrompter {
    pub fn new(decisions: impl IntoIterator<Item = FixDecision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, _issue: &DriftIssue, _options: &[FixAction]) -> FixDecision {
        self.decisions.pop_front().unwrap_or(FixDecision::Skip)
    }
}

/// Apply one action. Fix conflicts (the target vanished or no longer matches)
/// abort only this fix; the caller notes it and continues the run.
pub fn apply(
    action: FixAction,
    issue: &DriftIssue,
    root: &Path,
    repo: Option<&RepoView>,
) -> Result<(), ArtifactError> {
    match action {
        FixAction::StageFile => {
            let repo = repo.ok_or(ArtifactError::EnvironmentUnavailable)?;
            let file = issue
                .file
                .as_deref()
                .ok_or_else(|| ArtifactError::FixConflict("issue carries no file".into()))?;
            if !root.join(file).exists() {
                return Err(ArtifactError::FixConflict(file.to_string()));
            }
            repo.stage(file)?;
            Ok(())
        }
        FixAction::SetHooksPath => {
            let repo = repo.ok_or(ArtifactError::EnvironmentUnavailable)?;
            let expected = issue
                .extra
                .get("expected")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ArtifactError::FixConflict("no expected hooks path".into()))?;
            repo.set_hooks_path(expected)?;
            Ok(())
        }
        FixAction::MarkCriteriaComplete => {
            let file = issue
                .file
                .as_deref()
                .ok_or_else(|| ArtifactError::FixConflict("issue carries no file".into()))?;
            let path = root.join(file);
            let text = std::fs::read_to_string(&path)
                .map_err(|_| ArtifactError::FixConflict(file.to_string()))?;
            atomic_write(&path, &acceptance::mark_all_complete(&text))
        }
        FixAction::PromoteToInProgress => set_registry_status(issue, root, FeatureStatus::InProgress),
        FixAction::MarkPaused => set_registry_status(issue, root, FeatureStatus::Paused),
    }
}

fn set_registry_status(
    issue: &DriftIssue,
    root: &Path,
    status: FeatureStatus,
) -> Result<(), ArtifactError> {
    let feature = issue
        .feature
        .as_deref()
        .ok_or_else(|| ArtifactError::FixConflict("issue carries no feature".into()))?;
    let path = root.join("spec").join("FEATURES.md");
    let text = std::fs::read_to_string(&path)
        .map_err(|_| ArtifactError::MissingArtifact("spec/FEATURES.md".into()))?;
    let updated = registry::set_status(&text, feature, status)
        .ok_or_else(|| ArtifactError::FixConflict(format!("{feature} not found in registry")))?;
    atomic_write(&path, &updated)
}

/// Write-temp-then-rename in the target's directory, so a crash mid-write can
/// never leave the artifact partially written.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), ArtifactError> {
    let parent = path
        .parent()
        .ok_or_else(|| ArtifactError::FixConflict(format!("{} has no parent", path.display())))?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| ArtifactError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(classify(IssueKind::UntrackedFile), Safety::Safe);
        assert_eq!(classify(IssueKind::HookPath), Safety::Safe);
        assert_eq!(classify(IssueKind::StatusDrift), Safety::Interactive);
        assert_eq!(classify(IssueKind::IncompleteShipped), Safety::Interactive);
        assert_eq!(classify(IssueKind::DocDrift), Safety::ReportOnly);
        assert_eq!(classify(IssueKind::UndocumentedCode), Safety::ReportOnly);
    }

    #[test]
    fn test_orphaned_acceptance_offers_no_delete() {
        assert!(actions_for(IssueKind::OrphanedAcceptance).is_empty());
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("FEATURES.md");
        std::fs::write(&path, "old").expect("seed file");
        atomic_write(&path, "new contents\n").expect("atomic write");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read back"),
            "new contents\n"
        );
    }

    #[test]
    fn test_mark_criteria_complete_conflict_when_file_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let issue = DriftIssue::new(IssueKind::IncompleteShipped, "x")
            .with_file("spec/acceptance/F-0001.md");
        let result = apply(FixAction::MarkCriteriaComplete, &issue, dir.path(), None);
        assert!(matches!(result, Err(ArtifactError::FixConflict(_))));
    }

    #[test]
    fn test_scripted_prompter_defaults_to_skip() {
        let mut prompter = ScriptedPrompter::default();
        let issue = DriftIssue::new(IssueKind::StatusDrift, "x");
        assert_eq!(
            prompter.choose(&issue, actions_for(IssueKind::StatusDrift)),
            FixDecision::Skip
        );
    }
}
