//! Run rendering.
//!
//! Two renderings of the same issue set: colorized text grouped by check
//! with a remediation hint per issue, or a stable JSON document consumed by
//! downstream aggregation tooling. Degradation notes appear in text mode
//! only — the JSON schema stays fixed.

use std::io::Write;

use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use crate::models::{IssueKind, SyncReport};

/// The stable machine-readable document.
///
/// ```text
/// { "tool": "drift"|"sync", "timestamp": ISO8601,
///   "issues": [ {"type", "description", "file"?, "feature"?, ...} ],
///   "summary": {"total_issues": int, "fixed_issues": int} }
/// ```
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'a str,
    pub timestamp: String,
    pub issues: &'a [crate::models::DriftIssue],
    pub summary: JsonSummary,
}

#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total_issues: usize,
    pub fixed_issues: usize,
}

pub fn render_json(tool: &str, report: &SyncReport) -> serde_json::Value {
    serde_json::to_value(JsonReport {
        tool,
        timestamp: Utc::now().to_rfc3339(),
        issues: &report.issues,
        summary: JsonSummary {
            total_issues: report.total(),
            fixed_issues: report.fixed_count,
        },
    })
    .unwrap_or_else(|_| serde_json::json!({"tool": tool, "issues": []}))
}

/// Human-readable rendering. Quiet mode prints nothing when the run is clean.
pub fn render_text(
    tool: &str,
    report: &SyncReport,
    quiet: bool,
    out: &mut impl Write,
) -> std::io::Result<()> {
    if quiet && report.is_clean() && report.notes.is_empty() {
        return Ok(());
    }

    writeln!(out, "=== {tool} ===")?;

    if report.is_clean() {
        writeln!(out, "\n{} No drift found", "✓".bright_green())?;
    } else {
        let mut current_check = "";
        for issue in &report.issues {
            if issue.check != current_check {
                current_check = &issue.check;
                writeln!(out, "\n{}:", current_check.bright_white())?;
            }
            let dot = if issue.fixed {
                "●".bright_green()
            } else {
                "●".bright_red()
            };
            let state = if issue.fixed { " (fixed)" } else { "" };
            writeln!(out, "  {dot} {}{state}", issue.description)?;
            if !issue.fixed {
                writeln!(out, "    {}", hint(issue.kind).bright_black())?;
            }
        }
    }

    for note in &report.notes {
        writeln!(out, "\n{} {note}", "○".bright_yellow())?;
    }

    writeln!(
        out,
        "\n{} issue(s), {} fixed, {} check(s) clean",
        report.total(),
        report.fixed_count,
        report.ok_count
    )?;

    Ok(())
}

/// One remediation hint per issue kind, shown inline under each unfixed issue.
pub fn hint(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::IncompleteShipped => {
            "check off the remaining criteria, or reopen the feature if work remains"
        }
        IssueKind::StatusDrift => "update the registry status to match the actual progress",
        IssueKind::StaleInProgress => {
            "commit with the feature id, update STATUS.md, or pause the feature"
        }
        IssueKind::OrphanedAcceptance => {
            "add the feature to the registry, or retire the acceptance file"
        }
        IssueKind::OrphanedAnnotation => {
            "add the feature to the registry, or remove the stale annotation"
        }
        IssueKind::MissingAnnotation => "add an @feature annotation to the implementing files",
        IssueKind::StaleFocus => "refresh the focus line in STATUS.md",
        IssueKind::UntrackedFile => "stage the file, or ignore it explicitly",
        IssueKind::HookPath => "run sync to point core.hooksPath at the hooks directory",
        IssueKind::TemplateMarker => "replace the template content or delete the file",
        IssueKind::TemplatePlaceholder => "fill in the placeholder",
        IssueKind::DocDrift => "review whether the document still matches the code (advisory)",
        IssueKind::UndocumentedCode => "mention the symbol in the documentation, or unexport it",
        IssueKind::UndocumentedEndpoint => "document the route",
    }
}
