use serde::{Deserialize, Serialize};

/// One entry in the feature registry.
///
/// Features are permanent documentation: they are created by a human or agent
/// editing the registry, mutated only through single-field setters, and never
/// deleted — retirement is expressed by the `Deprecated` status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Registry identifier, `F-####`.
    pub id: String,
    pub name: String,
    pub status: FeatureStatus,
    /// Which registry schema this entry was read from.
    pub schema: RegistrySchema,
}

/// Lifecycle status of a feature.
///
/// The registry is hand-edited, so parsing is forgiving: `pending` is an
/// alias for `Planned`, and unrecognized values default to `Planned` rather
/// than failing the whole registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Planned,
    InProgress,
    Shipped,
    Deprecated,
    Paused,
}

impl FeatureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Shipped => "shipped",
            Self::Deprecated => "deprecated",
            Self::Paused => "paused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planned" | "pending" => Some(Self::Planned),
            "in_progress" | "in progress" => Some(Self::InProgress),
            "shipped" => Some(Self::Shipped),
            "deprecated" => Some(Self::Deprecated),
            "paused" => Some(Self::Paused),
            _ => None,
        }
    }
}

/// The two textual schemas a feature registry may use.
///
/// - `Heading`: one `## F-####: Name` section per feature with `- Status:`
///   key lines beneath it.
/// - `Table`: one markdown table row per feature, `| F-#### | Name | status | … |`.
///
/// Detection happens once per registry; the whole file is parsed with the
/// detected schema.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegistrySchema {
    Heading,
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_pending_alias() {
        assert_eq!(FeatureStatus::parse("pending"), Some(FeatureStatus::Planned));
        assert_eq!(
            FeatureStatus::parse("In Progress"),
            Some(FeatureStatus::InProgress)
        );
        assert_eq!(FeatureStatus::parse("bogus"), None);
    }
}
