use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Engine thresholds and scan scopes.
///
/// Defaults mirror the long-standing constants of the original tooling; each
/// can be overridden from the `## Settings` section of `STACK.md` with
/// `- key: value` lines. A missing file or section means defaults.
#[derive(Debug, Clone)]
pub struct DriftConfig {
    /// Days without activity before an in-progress feature counts as stale.
    pub stale_feature_days: i64,
    /// Days of commit history correlated against the status focus.
    pub focus_window_days: i64,
    /// Days of source changes correlated against documentation age.
    pub doc_stale_days: i64,
    /// Criteria completion percentage at which a planned feature is flagged.
    pub completion_threshold: u32,
    /// Directories whose untracked files are reported.
    pub source_roots: Vec<String>,
    /// Extension allow-list for the annotation scan.
    pub annotation_extensions: Vec<String>,
    /// Candidate hook directories, first existing one wins.
    pub hooks_dirs: Vec<String>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            stale_feature_days: 7,
            focus_window_days: 3,
            doc_stale_days: 30,
            completion_threshold: 50,
            source_roots: ["src", "spec", "tests", "docs"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            annotation_extensions: [
                "ts", "tsx", "js", "jsx", "py", "pyi", "rs", "go", "c", "cpp", "cc", "h", "hpp",
                "java", "kt", "kts", "swift", "rb", "php", "cs", "m", "mm",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            hooks_dirs: [".githooks", ".agentic/hooks"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

static SETTING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*-\s*([a-z_][a-z0-9_]*):\s*([^#\n<]+)").expect("valid regex"));

impl DriftConfig {
    /// Load the configuration for a repository root.
    pub fn load(root: &Path) -> Self {
        let mut config = Self::default();
        let Ok(text) = std::fs::read_to_string(root.join("STACK.md")) else {
            return config;
        };
        for (key, value) in settings_section(&text) {
            config.apply(&key, &value);
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "stale_feature_days" => {
                if let Ok(v) = value.parse() {
                    self.stale_feature_days = v;
                }
            }
            "focus_window_days" => {
                if let Ok(v) = value.parse() {
                    self.focus_window_days = v;
                }
            }
            "doc_stale_days" => {
                if let Ok(v) = value.parse() {
                    self.doc_stale_days = v;
                }
            }
            "completion_threshold" => {
                if let Ok(v) = value.parse() {
                    self.completion_threshold = v;
                }
            }
            "source_roots" => {
                self.source_roots = split_list(value);
            }
            "annotation_extensions" => {
                self.annotation_extensions = split_list(value);
            }
            "hooks_dir" => {
                self.hooks_dirs = vec![value.to_string()];
            }
            _ => {}
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split([',', ' '])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Extract `- key: value` pairs from the `## Settings` section of STACK.md.
/// Inline `#` comments and HTML comments are stripped from values. The
/// section ends at the next H2 heading.
fn settings_section(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        if !in_section {
            if line.trim_start().starts_with("## Settings") {
                in_section = true;
            }
            continue;
        }
        if line.starts_with("## ") {
            break;
        }
        if let Some(caps) = SETTING_LINE.captures(line) {
            let key = caps[1].trim().to_lowercase();
            let value = caps[2].trim().to_string();
            if !value.is_empty() {
                pairs.push((key, value));
            }
        }
    }
    pairs
}
