//! Session journal parsing.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::JournalEntry;

static SESSION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s+Session:\s*(.+?)\s*$").expect("valid regex"));
static FIELD_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([A-Za-z][A-Za-z ]*?)\*\*\s*:\s*(.*?)\s*$").expect("valid regex"));

/// Load the journal. The `.agentic-journal/` location is preferred over the
/// repository root; neither existing yields an empty list.
pub fn load(root: &Path) -> Vec<JournalEntry> {
    let candidates = [
        root.join(".agentic-journal").join("JOURNAL.md"),
        root.join("JOURNAL.md"),
    ];
    for path in candidates {
        if let Ok(text) = std::fs::read_to_string(&path) {
            return parse(&text);
        }
    }
    Vec::new()
}

/// Parse the journal into session entries, in file order.
pub fn parse(text: &str) -> Vec<JournalEntry> {
    let mut entries: Vec<JournalEntry> = Vec::new();
    let mut current_field: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = SESSION_HEADER.captures(line) {
            entries.push(JournalEntry {
                timestamp: parse_timestamp(&caps[1]),
                topic: None,
                accomplished: Vec::new(),
                next_steps: Vec::new(),
                blockers: Vec::new(),
                metadata: BTreeMap::new(),
            });
            current_field = None;
            continue;
        }
        let Some(entry) = entries.last_mut() else {
            continue;
        };

        if let Some(caps) = FIELD_LABEL.captures(line) {
            let label = caps[1].to_lowercase();
            let inline = caps[2].trim();
            match label.as_str() {
                "topic" => {
                    entry.topic = Some(inline.to_string());
                    current_field = None;
                }
                "accomplished" | "next steps" | "blockers" => {
                    current_field = Some(label);
                }
                _ => {
                    if !inline.is_empty() {
                        entry.metadata.insert(label, inline.to_string());
                    }
                    current_field = None;
                }
            }
            continue;
        }

        let trimmed = line.trim();
        if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let item = item.trim().to_string();
            match current_field.as_deref() {
                Some("accomplished") => entry.accomplished.push(item),
                Some("next steps") => entry.next_steps.push(item),
                Some("blockers") => entry.blockers.push(item),
                _ => {}
            }
        }
    }

    entries
}

/// Session timestamps are hand-written; try the formats seen in real
/// journals, fall back to a bare date, else no timestamp at all.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    for fmt in ["%Y-%m-%d %H:%M", "%Y-%m-%d-%H%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}
