//! Documentation scan.

use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use super::sources::is_excluded_dir;

/// One markdown document, loaded whole for keyword correlation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocFile {
    /// Path relative to the repository root.
    pub path: String,
    pub text: String,
}

/// Collect every markdown file under the root, skipping hidden and vendored
/// directories. Used for placeholder scans and keyword-overlap correlation
/// against recently changed code.
pub fn scan(root: &Path) -> Vec<DocFile> {
    let mut docs = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        e.depth() == 0
            || e.file_name()
                .to_str()
                .map(|name| !(e.file_type().is_dir() && is_excluded_dir(name)))
                .unwrap_or(false)
    });

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(path) else {
            continue;
        };
        docs.push(DocFile {
            path: path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string(),
            text,
        });
    }

    docs.sort_by(|a, b| a.path.cmp(&b.path));
    docs
}
