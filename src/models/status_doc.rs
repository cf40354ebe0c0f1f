use serde::{Deserialize, Serialize};

/// The project status document (`STATUS.md`).
///
/// Hand-maintained, so every field is optional; the raw text is kept so
/// checks can scan for feature-id mentions beyond the recognized keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusDocument {
    pub focus: Option<String>,
    pub progress: Option<String>,
    pub next_step: Option<String>,
    pub blocker: Option<String>,
    pub last_updated: Option<String>,
    #[serde(skip)]
    pub raw: String,
}

impl StatusDocument {
    /// Whether the document mentions the given feature id anywhere.
    pub fn mentions(&self, feature_id: &str) -> bool {
        self.raw.contains(feature_id)
    }

    /// Keywords drawn from the focus line, lowercased, short/common words
    /// dropped. Used by the focus-staleness correlation against commits.
    pub fn focus_keywords(&self) -> Vec<String> {
        let Some(focus) = &self.focus else {
            return Vec::new();
        };
        let mut words: Vec<String> = focus
            .split(|c: char| !c.is_alphanumeric() && c != '_' && c != '-')
            .filter(|w| w.len() >= 4)
            .map(|w| w.to_lowercase())
            .collect();
        words.sort();
        words.dedup();
        words
    }
}
