//! Documentation correlation checks.
//!
//! These are the heuristic end of the rule engine: keyword overlap between
//! prose and code, and best-effort scans for exported symbols and route
//! declarations. All three are advisory — none of their issue kinds has an
//! automated fix, and the documentation-drift correlation is skipped in
//! quiet mode.

use anyhow::Result;
use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{DriftIssue, IssueKind};
use crate::readers::Snapshot;

use super::{Check, Needs};

/// A document that talks about recently changed code but has not itself been
/// touched inside the change window. Keyword overlap misfires on short or
/// common identifiers, which is why this stays advisory.
pub struct DocumentationDriftCheck;

impl Check for DocumentationDriftCheck {
    fn name(&self) -> &'static str {
        "documentation_drift"
    }

    fn needs(&self) -> Needs {
        Needs {
            repo: true,
            docs: true,
            ..Default::default()
        }
    }

    fn expensive(&self) -> bool {
        true
    }

    fn doc_scope(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let Some(repo) = snapshot.repo.as_ref() else {
            return Ok(Vec::new());
        };
        let days = snapshot.config.doc_stale_days;
        let cutoff = snapshot.now - Duration::days(days);

        // Keywords derived from source files changed inside the window.
        let mut keywords: Vec<(String, String)> = Vec::new();
        for (path, time) in &repo.changed_files {
            if *time < cutoff || !is_source_path(snapshot, path) {
                continue;
            }
            for keyword in stem_keywords(path) {
                if !keywords.iter().any(|(k, _)| *k == keyword) {
                    keywords.push((keyword, path.clone()));
                }
            }
        }
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let mut issues = Vec::new();
        for doc in &snapshot.docs {
            if repo.changed_since(&doc.path, cutoff) {
                continue;
            }
            let text = doc.text.to_lowercase();
            let Some((keyword, source)) = keywords.iter().find(|(k, _)| text.contains(k)) else {
                continue;
            };
            issues.push(
                DriftIssue::new(
                    IssueKind::DocDrift,
                    format!(
                        "{} mentions '{keyword}' but has not changed alongside {source} in the last {days} days",
                        doc.path
                    ),
                )
                .with_file(&doc.path)
                .with_extra("keyword", keyword.as_str())
                .with_extra("source", source.as_str()),
            );
        }

        Ok(issues)
    }
}

static RS_PUB_FN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*pub fn ([a-z_][a-z0-9_]*)").expect("valid regex"));
static TS_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^export\s+(?:async\s+)?(?:function|const)\s+(\w+)").expect("valid regex")
});
static PY_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^def ([a-z][a-z0-9_]*)").expect("valid regex"));

/// Exported symbols no documentation mentions.
pub struct UndocumentedExportCheck;

impl Check for UndocumentedExportCheck {
    fn name(&self) -> &'static str {
        "undocumented_exports"
    }

    fn needs(&self) -> Needs {
        Needs {
            docs: true,
            ..Default::default()
        }
    }

    fn expensive(&self) -> bool {
        true
    }

    fn doc_scope(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        // No documentation at all means nothing to compare against.
        if snapshot.docs.is_empty() {
            return Ok(Vec::new());
        }

        let mut issues = Vec::new();
        for source in &snapshot.sources {
            if is_test_path(&source.path) {
                continue;
            }
            let pattern: &Regex = match extension(&source.path) {
                "rs" => &RS_PUB_FN,
                "ts" | "tsx" | "js" | "jsx" => &TS_EXPORT,
                "py" => &PY_DEF,
                _ => continue,
            };
            for caps in pattern.captures_iter(&source.text) {
                let symbol = &caps[1];
                if symbol.len() < 4 || symbol == "main" {
                    continue;
                }
                let documented = snapshot.docs.iter().any(|d| d.text.contains(symbol));
                if documented {
                    continue;
                }
                issues.push(
                    DriftIssue::new(
                        IssueKind::UndocumentedCode,
                        format!(
                            "exported symbol '{symbol}' in {} is not mentioned in any documentation",
                            source.path
                        ),
                    )
                    .with_file(&source.path)
                    .with_extra("symbol", symbol),
                );
            }
        }

        Ok(issues)
    }
}

static JS_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:app|router)\.(?:get|post|put|delete|patch)\(\s*["']([^"']+)"#)
        .expect("valid regex")
});
static PY_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@\w+\.route\(\s*["']([^"']+)"#).expect("valid regex"));
static RS_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"#\[(?:get|post|put|delete|patch)\("([^"]+)"\)\]"#).expect("valid regex")
});

/// Route declarations no documentation mentions.
pub struct UndocumentedEndpointCheck;

impl Check for UndocumentedEndpointCheck {
    fn name(&self) -> &'static str {
        "undocumented_endpoints"
    }

    fn needs(&self) -> Needs {
        Needs {
            docs: true,
            ..Default::default()
        }
    }

    fn expensive(&self) -> bool {
        true
    }

    fn doc_scope(&self) -> bool {
        true
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        if snapshot.docs.is_empty() {
            return Ok(Vec::new());
        }

        let mut issues = Vec::new();
        for source in &snapshot.sources {
            if is_test_path(&source.path) {
                continue;
            }
            for pattern in [&JS_ROUTE, &PY_ROUTE, &RS_ROUTE] {
                for caps in pattern.captures_iter(&source.text) {
                    let route = &caps[1];
                    let documented = snapshot.docs.iter().any(|d| d.text.contains(route));
                    if documented {
                        continue;
                    }
                    issues.push(
                        DriftIssue::new(
                            IssueKind::UndocumentedEndpoint,
                            format!(
                                "route '{route}' declared in {} is not mentioned in any documentation",
                                source.path
                            ),
                        )
                        .with_file(&source.path)
                        .with_extra("route", route),
                    );
                }
            }
        }

        Ok(issues)
    }
}

fn extension(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or("")
}

fn is_source_path(snapshot: &Snapshot, path: &str) -> bool {
    snapshot
        .config
        .annotation_extensions
        .iter()
        .any(|ext| ext == extension(path))
}

fn is_test_path(path: &str) -> bool {
    path.starts_with("tests/") || path.contains("/tests/") || path.contains("test_")
}

/// Keywords from a path's file stem: the whole stem plus each word of four
/// characters or more, lowercased.
fn stem_keywords(path: &str) -> Vec<String> {
    let stem = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .split('.')
        .next()
        .unwrap_or("");
    let mut keywords: Vec<String> = stem
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 4)
        .map(|w| w.to_lowercase())
        .collect();
    let full = stem.to_lowercase();
    if full.len() >= 4 && !keywords.contains(&full) {
        keywords.push(full);
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use crate::readers::{DocFile, SourceFile};
    use crate::repo::RepoSnapshot;
    use chrono::Utc;
    use std::path::PathBuf;

    fn snapshot() -> Snapshot {
        Snapshot {
            root: PathBuf::from("/repo"),
            config: DriftConfig::default(),
            now: Utc::now(),
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
    fn test_stem_keywords() {
        let keywords = stem_keywords("src/render_engine.rs");
        assert!(keywords.contains(&"render".to_string()));
        assert!(keywords.contains(&"engine".to_string()));
        assert!(keywords.contains(&"render_engine".to_string()));
    }

    #[test]
    fn test_doc_drift_fires_for_stale_doc() {
        let mut snap = snapshot();
        snap.repo = Some(RepoSnapshot {
            changed_files: vec![("src/render_engine.rs".to_string(), Utc::now())],
            ..Default::default()
        });
        snap.docs = vec![DocFile {
            path: "docs/architecture.md".to_string(),
            text: "The render_engine turns scenes into frames.".to_string(),
        }];
        let issues = DocumentationDriftCheck.run(&snap).expect("runs");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DocDrift);
    }

    #[test]
    fn test_doc_drift_quiet_when_doc_changed_too() {
        let mut snap = snapshot();
        snap.repo = Some(RepoSnapshot {
            changed_files: vec![
                ("src/render_engine.rs".to_string(), Utc::now()),
                ("docs/architecture.md".to_string(), Utc::now()),
            ],
            ..Default::default()
        });
        snap.docs = vec![DocFile {
            path: "docs/architecture.md".to_string(),
            text: "The render_engine turns scenes into frames.".to_string(),
        }];
        assert!(DocumentationDriftCheck.run(&snap).expect("runs").is_empty());
    }

    #[test]
    fn test_undocumented_export() {
        let mut snap = snapshot();
        snap.docs = vec![DocFile {
            path: "docs/api.md".to_string(),
            text: "Only parse_registry is documented.".to_string(),
        }];
        snap.sources = vec![SourceFile {
            path: "src/lib.rs".to_string(),
            text: "pub fn parse_registry() {}\npub fn stage_files() {}\n".to_string(),
        }];
        let issues = UndocumentedExportCheck.run(&snap).expect("runs");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].extra["symbol"], "stage_files");
    }

    #[test]
    fn test_undocumented_endpoint() {
        let mut snap = snapshot();
        snap.docs = vec![DocFile {
            path: "docs/api.md".to_string(),
            text: "GET /api/v1/features lists features.".to_string(),
        }];
        snap.sources = vec![SourceFile {
            path: "src/server.ts".to_string(),
            text: "app.get(\"/api/v1/features\", list)\napp.post(\"/api/v1/sync\", sync)\n"
                .to_string(),
        }];
        let issues = UndocumentedEndpointCheck.run(&snap).expect("runs");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].extra["route"], "/api/v1/sync");
    }
}
