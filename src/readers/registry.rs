//! Feature registry parsing.
//!
//! The registry (`spec/FEATURES.md`) appears in the wild in two incompatible
//! schemas: one `## F-####: Name` heading per feature with key lines beneath
//! it, or one markdown table row per feature. The schema is detected once and
//! the whole file is parsed with it; both produce the same canonical
//! [`Feature`] records so the rule engine never branches on schema.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Feature, FeatureStatus, RegistrySchema};

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^##\s+(F-\d{4}):\s*(.*?)\s*$").expect("valid regex"));
static TABLE_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|\s*F-\d{4}\s*\|").expect("valid regex"));
static STATUS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:-\s*|\*\*)status(?:\*\*)?\s*:\s*(.+?)\s*$").expect("valid regex"));

/// Detect which schema a registry uses. A table row marker anywhere selects
/// the table schema; otherwise headings. Undetectable input defaults to the
/// heading schema and parsing proceeds (yielding no features rather than an
/// error).
pub fn detect_schema(text: &str) -> RegistrySchema {
    if text.lines().any(|l| TABLE_ROW.is_match(l)) {
        RegistrySchema::Table
    } else {
        RegistrySchema::Heading
    }
}

/// Parse a registry into canonical features plus the schema that was used.
pub fn parse(text: &str) -> (Vec<Feature>, RegistrySchema) {
    let schema = detect_schema(text);
    let features = match schema {
        RegistrySchema::Heading => parse_heading(text),
        RegistrySchema::Table => parse_table(text),
    };
    (features, schema)
}

fn parse_heading(text: &str) -> Vec<Feature> {
    let mut features: Vec<Feature> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = HEADING.captures(line) {
            features.push(Feature {
                id: caps[1].to_string(),
                name: caps[2].to_string(),
                status: FeatureStatus::Planned,
                schema: RegistrySchema::Heading,
            });
            continue;
        }
        let Some(current) = features.last_mut() else {
            continue;
        };
        if let Some(caps) = STATUS_LINE.captures(line) {
            let value = caps[1].trim_end_matches('*');
            if let Some(status) = FeatureStatus::parse(value) {
                current.status = status;
            }
        }
    }

    features
}

fn parse_table(text: &str) -> Vec<Feature> {
    let mut features = Vec::new();

    for line in text.lines() {
        if !TABLE_ROW.is_match(line) {
            continue;
        }
        // | F-0001 | Name | status | ... |
        let cells: Vec<&str> = line
            .trim()
            .trim_start_matches('|')
            .trim_end_matches('|')
            .split('|')
            .map(|c| c.trim())
            .collect();
        let Some(id) = cells.first() else { continue };
        let name = cells.get(1).copied().unwrap_or("").to_string();
        let status = cells
            .get(2)
            .and_then(|s| FeatureStatus::parse(s))
            .unwrap_or(FeatureStatus::Planned);
        features.push(Feature {
            id: id.to_string(),
            name,
            status,
            schema: RegistrySchema::Table,
        });
    }

    features
}

/// Rewrite a single feature's status field, preserving everything else.
///
/// This is the one registry mutation the fix engine performs. Returns `None`
/// when the feature cannot be found under the detected schema — the caller
/// treats that as a fix conflict, not an error.
pub fn set_status(text: &str, feature_id: &str, status: FeatureStatus) -> Option<String> {
    match detect_schema(text) {
        RegistrySchema::Heading => set_status_heading(text, feature_id, status),
        RegistrySchema::Table => set_status_table(text, feature_id, status),
    }
}

fn set_status_heading(text: &str, feature_id: &str, status: FeatureStatus) -> Option<String> {
    let mut out = Vec::new();
    let mut in_target = false;
    let mut replaced = false;

    for line in text.lines() {
        if let Some(caps) = HEADING.captures(line) {
            in_target = &caps[1] == feature_id;
            out.push(line.to_string());
            continue;
        }
        if in_target && !replaced && STATUS_LINE.is_match(line) {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            out.push(format!("{indent}- Status: {}", status.as_str()));
            replaced = true;
            continue;
        }
        out.push(line.to_string());
    }

    replaced.then(|| join_preserving_trailing_newline(text, out))
}

fn set_status_table(text: &str, feature_id: &str, status: FeatureStatus) -> Option<String> {
    let mut out = Vec::new();
    let mut replaced = false;

    for line in text.lines() {
        if !replaced && TABLE_ROW.is_match(line) {
            let mut cells: Vec<String> = line
                .trim()
                .trim_start_matches('|')
                .trim_end_matches('|')
                .split('|')
                .map(|c| c.trim().to_string())
                .collect();
            if cells.first().map(String::as_str) == Some(feature_id) && cells.len() > 2 {
                cells[2] = status.as_str().to_string();
                out.push(format!("| {} |", cells.join(" | ")));
                replaced = true;
                continue;
            }
        }
        out.push(line.to_string());
    }

    replaced.then(|| join_preserving_trailing_newline(text, out))
}

fn join_preserving_trailing_newline(original: &str, lines: Vec<String>) -> String {
    let mut joined = lines.join("\n");
    if original.ends_with('\n') {
        joined.push('\n');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADING_MD: &str = "\
# Features

## F-0001: Router
- Status: shipped
- Code: src/router.rs

## F-0002: Ingest
- Status: in_progress
";

    const TABLE_MD: &str = "\
# Features

| ID | Name | Status | Priority |
|----|------|--------|----------|
| F-0001 | Router | shipped | 1 |
| F-0002 | Ingest | in_progress | 2 |
";

    #[test]
    fn test_heading_schema_parses() {
        let (features, schema) = parse(HEADING_MD);
        assert_eq!(schema, RegistrySchema::Heading);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "F-0001");
        assert_eq!(features[0].name, "Router");
        assert_eq!(features[0].status, FeatureStatus::Shipped);
        assert_eq!(features[1].status, FeatureStatus::InProgress);
    }

    #[test]
    fn test_table_schema_parses_equivalently() {
        let (features, schema) = parse(TABLE_MD);
        assert_eq!(schema, RegistrySchema::Table);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "F-0001");
        assert_eq!(features[0].name, "Router");
        assert_eq!(features[0].status, FeatureStatus::Shipped);
    }

    #[test]
    fn test_bold_status_variant() {
        let md = "## F-0003: Export\n**Status**: paused\n";
        let (features, _) = parse(md);
        assert_eq!(features[0].status, FeatureStatus::Paused);
    }

    #[test]
    fn test_unknown_status_defaults_to_planned() {
        let md = "## F-0004: Weird\n- Status: someday\n";
        let (features, _) = parse(md);
        assert_eq!(features[0].status, FeatureStatus::Planned);
    }

    #[test]
    fn test_set_status_heading_touches_one_field() {
        let updated = set_status(HEADING_MD, "F-0002", FeatureStatus::Paused).expect("replaced");
        assert!(updated.contains("## F-0002: Ingest\n- Status: paused"));
        assert!(updated.contains("- Status: shipped"));
        assert!(updated.contains("- Code: src/router.rs"));
    }

    #[test]
    fn test_set_status_table_touches_one_row() {
        let updated = set_status(TABLE_MD, "F-0001", FeatureStatus::Deprecated).expect("replaced");
        assert!(updated.contains("| F-0001 | Router | deprecated | 1 |"));
        assert!(updated.contains("| F-0002 | Ingest | in_progress | 2 |"));
    }

    #[test]
    fn test_set_status_missing_feature_is_none() {
        assert!(set_status(HEADING_MD, "F-0099", FeatureStatus::Shipped).is_none());
    }
}
