use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single detected inconsistency between two project artifacts.
///
/// Issues are ephemeral: recomputed on every run, never persisted except as
/// part of the JSON report. The `extra` map carries kind-specific attributes
/// (e.g. `completion` for status drift) and is flattened into the JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    /// Set when a fix was applied to this issue during the run.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub fixed: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
    /// Name of the check that produced this issue, for grouped text output.
    #[serde(skip)]
    pub check: String,
}

impl DriftIssue {
    pub fn new(kind: IssueKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            file: None,
            feature: None,
            fixed: false,
            extra: BTreeMap::new(),
            check: String::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

/// The classification of a drift issue.
///
/// Serialized as the stable `type` string in the JSON report; downstream
/// aggregation tooling matches on these values, so renames are breaking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    IncompleteShipped,
    StatusDrift,
    StaleInProgress,
    OrphanedAcceptance,
    OrphanedAnnotation,
    MissingAnnotation,
    StaleFocus,
    UntrackedFile,
    HookPath,
    TemplateMarker,
    TemplatePlaceholder,
    DocDrift,
    UndocumentedCode,
    UndocumentedEndpoint,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncompleteShipped => "incomplete_shipped",
            Self::StatusDrift => "status_drift",
            Self::StaleInProgress => "stale_in_progress",
            Self::OrphanedAcceptance => "orphaned_acceptance",
            Self::OrphanedAnnotation => "orphaned_annotation",
            Self::MissingAnnotation => "missing_annotation",
            Self::StaleFocus => "stale_focus",
            Self::UntrackedFile => "untracked_file",
            Self::HookPath => "hook_path",
            Self::TemplateMarker => "template_marker",
            Self::TemplatePlaceholder => "template_placeholder",
            Self::DocDrift => "doc_drift",
            Self::UndocumentedCode => "undocumented_code",
            Self::UndocumentedEndpoint => "undocumented_endpoint",
        }
    }
}

/// The accumulated result of one engine run.
///
/// Threaded through the orchestrator as an explicit value; there is no
/// process-wide counter state. `notes` carries per-check degradation
/// diagnostics and is rendered in text mode only.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub issues: Vec<DriftIssue>,
    /// Checks that ran and found nothing.
    pub ok_count: usize,
    pub fixed_count: usize,
    pub notes: Vec<String>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of issues found that were not repaired during the run.
    pub fn remaining(&self) -> usize {
        self.issues.iter().filter(|i| !i.fixed).count()
    }

    pub fn total(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
