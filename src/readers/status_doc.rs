//! Status document parsing.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::StatusDocument;

static KEY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:-\s*|\*\*)(focus|current focus|progress|next steps?|blockers?|last updated)(?:\*\*)?\s*:\s*(.+?)\s*$")
        .expect("valid regex")
});
static SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^##\s+(focus|current focus|progress|next steps?|blockers?)\s*$")
        .expect("valid regex")
});

/// Load `STATUS.md` from the root. `None` when the file is absent — dependent
/// checks are skipped silently.
pub fn load(root: &Path) -> Option<StatusDocument> {
    let text = std::fs::read_to_string(root.join("STATUS.md")).ok()?;
    Some(parse(&text))
}

/// Parse the status document. Recognizes both `- Focus: …` key lines and
/// `## Focus` sections whose value is the first non-empty line beneath them.
pub fn parse(text: &str) -> StatusDocument {
    let mut doc = StatusDocument {
        raw: text.to_string(),
        ..Default::default()
    };

    let mut pending_section: Option<String> = None;
    for line in text.lines() {
        if let Some(caps) = KEY_LINE.captures(line) {
            assign(&mut doc, &caps[1].to_lowercase(), caps[2].trim());
            pending_section = None;
            continue;
        }
        if let Some(caps) = SECTION.captures(line) {
            pending_section = Some(caps[1].to_lowercase());
            continue;
        }
        if line.starts_with('#') {
            pending_section = None;
            continue;
        }
        if let Some(section) = &pending_section {
            let value = line.trim().trim_start_matches(['-', '*']).trim();
            if !value.is_empty() {
                assign(&mut doc, section, value);
                pending_section = None;
            }
        }
    }

    doc
}

fn assign(doc: &mut StatusDocument, key: &str, value: &str) {
    let slot = match key {
        "focus" | "current focus" => &mut doc.focus,
        "progress" => &mut doc.progress,
        "next step" | "next steps" => &mut doc.next_step,
        "blocker" | "blockers" => &mut doc.blocker,
        "last updated" => &mut doc.last_updated,
        _ => return,
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}
