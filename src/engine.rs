//! The orchestrator.
//!
//! Loads one snapshot, runs every check in the fixed order, classifies each
//! issue through the fix policy, and accumulates the [`SyncReport`] value.
//! This is the only component that invokes mutating fix actions. A check's
//! internal failure degrades to zero issues for that check plus a note; the
//! run itself never aborts.

use std::path::Path;

use crate::checks;
use crate::config::DriftConfig;
use crate::fixes::{self, FixDecision, Prompter, RunMode, Safety};
use crate::models::{DriftIssue, IssueKind, SyncReport};
use crate::readers::Snapshot;
use crate::repo::RepoView;

/// Flags resolved from either CLI surface.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// "drift" or "sync"; recorded in the JSON document.
    pub tool: &'static str,
    pub mode: RunMode,
    /// Exit 1 when unrepaired issues remain (`--check`).
    pub fail_on_issues: bool,
    pub quiet: bool,
    /// Restrict to the documentation checks (`--docs`).
    pub docs_only: bool,
    pub gaps: bool,
    pub orphans: bool,
    pub tests: bool,
    /// Scope to one feature's recorded change set (`--manifest`).
    pub manifest: Option<String>,
}

impl RunOptions {
    pub fn reporting(tool: &'static str) -> Self {
        Self {
            tool,
            mode: RunMode::Check,
            fail_on_issues: false,
            quiet: false,
            docs_only: false,
            gaps: false,
            orphans: false,
            tests: false,
            manifest: None,
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub report: SyncReport,
    pub exit_code: u8,
}

/// Run the whole engine against one repository root.
pub fn run(root: &Path, opts: &RunOptions, prompter: &mut dyn Prompter) -> RunOutcome {
    let config = DriftConfig::load(root);
    let snapshot = Snapshot::load(root, config);
    run_with_snapshot(&snapshot, opts, prompter)
}

/// Same engine against a pre-built snapshot. Exposed so tests can pin `now`
/// and artifact contents exactly.
pub fn run_with_snapshot(
    snapshot: &Snapshot,
    opts: &RunOptions,
    prompter: &mut dyn Prompter,
) -> RunOutcome {
    let mut report = SyncReport::new();

    for check in checks::all() {
        if opts.quiet && check.expensive() {
            continue;
        }
        if opts.docs_only && !check.doc_scope() {
            continue;
        }
        if !checks::runnable(check.as_ref(), snapshot) {
            tracing::debug!(check = check.name(), "skipped: needed artifact absent");
            continue;
        }

        match check.run(snapshot) {
            Ok(mut issues) => {
                issues.retain(|issue| in_scope(issue, opts, snapshot));
                if issues.is_empty() {
                    report.ok_count += 1;
                } else {
                    for issue in &mut issues {
                        issue.check = check.name().to_string();
                    }
                    report.issues.extend(issues);
                }
            }
            Err(e) => {
                tracing::warn!(check = check.name(), error = %e, "check degraded");
                report
                    .notes
                    .push(format!("check '{}' degraded: {e}", check.name()));
            }
        }
    }

    if opts.mode != RunMode::Check {
        apply_fixes(snapshot, opts, prompter, &mut report);
    }

    let exit_code = if opts.fail_on_issues && report.remaining() > 0 {
        1
    } else {
        0
    };

    RunOutcome { report, exit_code }
}

fn apply_fixes(
    snapshot: &Snapshot,
    opts: &RunOptions,
    prompter: &mut dyn Prompter,
    report: &mut SyncReport,
) {
    let repo = RepoView::open(&snapshot.root);
    let SyncReport {
        issues,
        notes,
        fixed_count,
        ..
    } = report;

    for issue in issues.iter_mut() {
        let options = fixes::actions_for(issue.kind);
        let decision = match (opts.mode, fixes::classify(issue.kind)) {
            (RunMode::Full, Safety::Safe) => options
                .first()
                .map(|a| FixDecision::Apply(*a))
                .unwrap_or(FixDecision::Skip),
            (RunMode::Interactive, Safety::Safe | Safety::Interactive) => {
                prompter.choose(issue, options)
            }
            _ => FixDecision::Skip,
        };

        match decision {
            FixDecision::Apply(action) => {
                match fixes::apply(action, issue, &snapshot.root, repo.as_ref()) {
                    Ok(()) => {
                        tracing::info!(kind = issue.kind.as_str(), "fix applied");
                        issue.fixed = true;
                        *fixed_count += 1;
                    }
                    Err(e) => {
                        notes.push(format!("fix for {} aborted: {e}", issue.kind.as_str()));
                    }
                }
            }
            FixDecision::Escalate => {
                notes.push(format!("escalated for human review: {}", issue.description));
            }
            FixDecision::Skip => {}
        }
    }
}

/// Report-scoping: `--gaps`, `--orphans`, `--tests` select issue-kind
/// families; `--manifest F-####` keeps issues attributed to that feature or
/// to a file in its recorded change set.
fn in_scope(issue: &DriftIssue, opts: &RunOptions, snapshot: &Snapshot) -> bool {
    if let Some(feature_id) = &opts.manifest {
        let in_manifest = issue.feature.as_deref() == Some(feature_id.as_str())
            || issue
                .file
                .as_deref()
                .is_some_and(|file| manifest_files(snapshot, feature_id).any(|f| f == file));
        if !in_manifest {
            return false;
        }
    }

    if !(opts.gaps || opts.orphans || opts.tests) {
        return true;
    }

    let gap_kinds = [
        IssueKind::MissingAnnotation,
        IssueKind::UndocumentedCode,
        IssueKind::UndocumentedEndpoint,
    ];
    let orphan_kinds = [IssueKind::OrphanedAcceptance, IssueKind::OrphanedAnnotation];
    let test_kinds = [
        IssueKind::IncompleteShipped,
        IssueKind::StatusDrift,
        IssueKind::OrphanedAcceptance,
    ];

    (opts.gaps && gap_kinds.contains(&issue.kind))
        || (opts.orphans && orphan_kinds.contains(&issue.kind))
        || (opts.tests && test_kinds.contains(&issue.kind))
}

/// The files attributed to one feature: its annotated sources plus its
/// acceptance file.
fn manifest_files<'a>(
    snapshot: &'a Snapshot,
    feature_id: &'a str,
) -> impl Iterator<Item = String> + 'a {
    snapshot
        .annotations
        .iter()
        .filter(move |a| a.feature_id == feature_id)
        .map(|a| a.file.clone())
        .chain(
            snapshot
                .acceptance
                .iter()
                .filter(move |d| d.feature_id == feature_id)
                .map(|d| snapshot.rel_path(&d.path)),
        )
}
