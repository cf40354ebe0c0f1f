//! Acceptance-criteria file parsing.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{AcceptanceDoc, Criterion};

static CHECKBOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s*\[( |x|X)\]\s*(.*?)\s*$").expect("valid regex"));
static ACCEPTANCE_STEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^F-\d{4}$").expect("valid regex"));

/// Parse one acceptance file's text into its checklist.
pub fn parse(feature_id: &str, path: &Path, text: &str) -> AcceptanceDoc {
    let criteria = text
        .lines()
        .filter_map(|line| {
            CHECKBOX.captures(line).map(|caps| Criterion {
                text: caps[2].to_string(),
                checked: !caps[1].trim().is_empty(),
            })
        })
        .collect();

    AcceptanceDoc {
        feature_id: feature_id.to_string(),
        path: path.to_path_buf(),
        criteria,
    }
}

/// Load every `spec/acceptance/F-####.md` under the root. A missing directory
/// yields an empty list; files that fail to read are skipped.
pub fn load_dir(root: &Path) -> Vec<AcceptanceDoc> {
    let dir = root.join("spec").join("acceptance");
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut docs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !ACCEPTANCE_STEM.is_match(stem) {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(&path) else {
            continue;
        };
        docs.push(parse(stem, &path, &text));
    }
    docs.sort_by(|a, b| a.feature_id.cmp(&b.feature_id));
    docs
}

/// Rewrite an acceptance file's text with every criterion checked. Only the
/// checkbox marker changes; surrounding prose is untouched.
pub fn mark_all_complete(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for line in text.lines() {
        if let Some(caps) = CHECKBOX.captures(line) {
            if caps[1].trim().is_empty() {
                // Replace only the first "[ ]" on the line.
                out.push(line.replacen("[ ]", "[x]", 1));
                continue;
            }
        }
        out.push(line.to_string());
    }
    let mut joined = out.join("\n");
    if text.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const DOC: &str = "\
# F-0001 acceptance

- [x] Parses both schemas
- [ ] Reports unchecked criteria
- [X] Handles empty files

Notes: [ ] outside a list item is not a criterion.
";

    #[test]
    fn test_parse_counts_checked_and_unchecked() {
        let doc = parse("F-0001", &PathBuf::from("spec/acceptance/F-0001.md"), DOC);
        assert_eq!(doc.total(), 3);
        assert_eq!(doc.complete(), 2);
        assert_eq!(
            doc.unchecked().map(|c| c.text.as_str()).collect::<Vec<_>>(),
            vec!["Reports unchecked criteria"]
        );
    }

    #[test]
    fn test_mark_all_complete_flips_only_checkboxes() {
        let updated = mark_all_complete(DOC);
        assert!(updated.contains("- [x] Reports unchecked criteria"));
        assert!(updated.contains("Notes: [ ] outside a list item"));
        let doc = parse("F-0001", &PathBuf::from("x"), &updated);
        assert_eq!(doc.complete(), 3);
    }
}
