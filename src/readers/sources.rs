//! Source-tree collection.

use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// One source file loaded whole. Shared by the annotation extraction and the
/// exported-symbol scans so the tree is walked once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the repository root.
    pub path: String,
    pub text: String,
}

/// Directory names never descended into; keeps generated and vendored trees
/// out of the scan.
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    "venv",
    ".venv",
    "env",
    "dist",
    "build",
    "target",
    "__pycache__",
    ".next",
    ".nuxt",
    "vendor",
    "deps",
];

pub fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

/// Collect source files restricted to the extension allow-list.
pub fn scan(root: &Path, extensions: &[String]) -> Vec<SourceFile> {
    let mut sources = Vec::new();

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
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !extensions.iter().any(|allowed| allowed == ext) {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(path) else {
            continue;
        };
        sources.push(SourceFile {
            path: path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string(),
            text,
        });
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    sources
}
