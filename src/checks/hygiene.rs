//! Working-tree and document hygiene checks.

use anyhow::Result;

use crate::models::{DriftIssue, IssueKind};
use crate::readers::Snapshot;

use super::{Check, Needs};

/// Untracked files under the known source roots. These are the files most
/// likely to be forgotten at commit time; staging them is a SAFE fix.
pub struct UntrackedFileCheck;

impl Check for UntrackedFileCheck {
    fn name(&self) -> &'static str {
        "untracked_files"
    }

    fn needs(&self) -> Needs {
        Needs {
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
        let mut issues = Vec::new();

        for path in &repo.untracked {
            let in_source_root = snapshot
                .config
                .source_roots
                .iter()
                .any(|root| path.starts_with(&format!("{root}/")));
            if !in_source_root {
                continue;
            }
            issues.push(
                DriftIssue::new(
                    IssueKind::UntrackedFile,
                    format!("{path} is untracked under a source root"),
                )
                .with_file(path),
            );
        }

        Ok(issues)
    }
}

/// The repository has a hooks directory but `core.hooksPath` does not point
/// at it, so the hooks never run. Setting the config value is a SAFE fix.
pub struct HookPathCheck;

impl Check for HookPathCheck {
    fn name(&self) -> &'static str {
        "hook_path"
    }

    fn needs(&self) -> Needs {
        Needs {
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

        let Some(hooks_dir) = snapshot
            .config
            .hooks_dirs
            .iter()
            .find(|dir| snapshot.root.join(dir).is_dir())
        else {
            return Ok(Vec::new());
        };

        if repo.hooks_path.as_deref() == Some(hooks_dir.as_str()) {
            return Ok(Vec::new());
        }

        let actual = repo.hooks_path.as_deref().unwrap_or("unset");
        Ok(vec![DriftIssue::new(
            IssueKind::HookPath,
            format!("core.hooksPath is {actual} but the repository hooks live in {hooks_dir}/"),
        )
        .with_file(hooks_dir)
        .with_extra("expected", hooks_dir.as_str())
        .with_extra("actual", actual)])
    }
}

/// Template debris in tracked documentation: files that still look like the
/// template they were copied from, and unfilled placeholder strings.
pub struct TemplateMarkerCheck;

const PLACEHOLDERS: &[&str] = &["(Not yet created)", "(To be created)", "(TBD)", "(TODO)"];

impl Check for TemplateMarkerCheck {
    fn name(&self) -> &'static str {
        "template_markers"
    }

    fn needs(&self) -> Needs {
        Needs {
            docs: true,
            ..Default::default()
        }
    }

    fn doc_scope(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let mut issues = Vec::new();

        for doc in &snapshot.docs {
            if looks_like_template(&doc.text) && !doc.path.ends_with("FEATURES.md") {
                issues.push(
                    DriftIssue::new(
                        IssueKind::TemplateMarker,
                        format!("{} still looks like template content", doc.path),
                    )
                    .with_file(&doc.path),
                );
            }

            for placeholder in PLACEHOLDERS {
                let count = doc.text.matches(placeholder).count();
                if count == 0 {
                    continue;
                }
                issues.push(
                    DriftIssue::new(
                        IssueKind::TemplatePlaceholder,
                        format!("{} contains '{placeholder}' ({count} occurrence(s))", doc.path),
                    )
                    .with_file(&doc.path)
                    .with_extra("placeholder", *placeholder)
                    .with_extra("count", count),
                );
            }
        }

        Ok(issues)
    }
}

fn looks_like_template(text: &str) -> bool {
    let first_lines: Vec<&str> = text.lines().take(3).collect();
    let head = first_lines.join("\n").to_lowercase();
    head.contains("(template)") || head.trim_end().ends_with("template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use crate::readers::DocFile;
    use crate::repo::RepoSnapshot;
    use std::path::PathBuf;

    fn snapshot() -> Snapshot {
        Snapshot {
            root: PathBuf::from("/repo"),
            config: DriftConfig::default(),
            now: chrono::Utc::now(),
            registry: None,
            acceptance: Vec::new(),
            status_doc: None,
            journal: Vec::new(),
            sources: Vec::new(),
            annotations: Vec::new(),
            docs: Vec::new(),
            repo: None,
        }
    }

    #[test]
    fn test_untracked_outside_source_roots_ignored() {
        let mut snap = snapshot();
        snap.repo = Some(RepoSnapshot {
            untracked: vec![
                "scratch.txt".to_string(),
                "src/new_module.rs".to_string(),
                "docs/notes.md".to_string(),
            ],
            ..Default::default()
        });
        let issues = UntrackedFileCheck.run(&snap).expect("runs");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].file.as_deref(), Some("src/new_module.rs"));
    }

    #[test]
    fn test_placeholder_counting() {
        let mut snap = snapshot();
        snap.docs = vec![DocFile {
            path: "CONTEXT_PACK.md".to_string(),
            text: "Intro\n\n- Runbook: (TBD)\n- Diagram: (TBD)\n- API docs: (Not yet created)\n"
                .to_string(),
        }];
        let issues = TemplateMarkerCheck.run(&snap).expect("runs");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::TemplatePlaceholder);
        assert_eq!(issues[0].extra["count"], 2);
    }

    #[test]
    fn test_template_heading_detection() {
        let mut snap = snapshot();
        snap.docs = vec![DocFile {
            path: "docs/RUNBOOK.md".to_string(),
            text: "# Runbook (template)\n\nFill me in.\n".to_string(),
        }];
        let issues = TemplateMarkerCheck.run(&snap).expect("runs");
        assert_eq!(issues[0].kind, IssueKind::TemplateMarker);
    }

    #[test]
    fn test_hook_path_mismatch() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join(".githooks")).expect("mkdir");
        let mut snap = snapshot();
        snap.root = dir.path().to_path_buf();
        snap.repo = Some(RepoSnapshot::default());
        let issues = HookPathCheck.run(&snap).expect("runs");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].extra["expected"], ".githooks");
        assert_eq!(issues[0].extra["actual"], "unset");
    }
}
