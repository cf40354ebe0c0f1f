//! `@feature` annotation extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::sources::SourceFile;

/// A feature-id reference found in a source comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnnotation {
    pub feature_id: String,
    /// Path relative to the repository root.
    pub file: String,
}

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@feature\s+(F-\d{4})").expect("valid regex"));

/// Extract `@feature F-####` annotations from collected sources. One
/// annotation per (feature, file) pair.
pub fn extract(sources: &[SourceFile]) -> Vec<CodeAnnotation> {
    let mut annotations: Vec<CodeAnnotation> = Vec::new();

    for source in sources {
        for caps in ANNOTATION.captures_iter(&source.text) {
            let feature_id = caps[1].to_string();
            let seen = annotations
                .iter()
                .any(|a| a.feature_id == feature_id && a.file == source.path);
            if !seen {
                annotations.push(CodeAnnotation {
                    feature_id,
                    file: source.path.clone(),
                });
            }
        }
    }

    annotations.sort_by(|a, b| (&a.feature_id, &a.file).cmp(&(&b.feature_id, &b.file)));
    annotations
}
