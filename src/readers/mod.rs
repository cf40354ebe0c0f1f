//! Artifact readers.
//!
//! One pure parse function per artifact type, each returning typed records so
//! parsing heuristics can evolve without touching check logic. Absence of a
//! source file is never an error: it yields an empty result and the checks
//! that depend on it are skipped silently.

pub mod acceptance;
pub mod annotations;
pub mod docs;
pub mod journal;
pub mod registry;
pub mod sources;
pub mod status_doc;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::config::DriftConfig;
use crate::models::{AcceptanceDoc, Feature, JournalEntry, RegistrySchema, StatusDocument};
use crate::repo::{RepoSnapshot, RepoView};

pub use annotations::CodeAnnotation;
pub use docs::DocFile;
pub use sources::SourceFile;

/// The parsed feature registry plus the schema it was read with.
#[derive(Debug, Clone)]
pub struct RegistryView {
    pub features: Vec<Feature>,
    pub schema: RegistrySchema,
}

/// Everything one run observes, loaded once. Checks are pure functions of
/// this value, which is what makes a run idempotent: identical snapshot,
/// identical issues.
#[derive(Debug)]
pub struct Snapshot {
    pub root: PathBuf,
    pub config: DriftConfig,
    /// Captured once so every window calculation agrees.
    pub now: DateTime<Utc>,
    pub registry: Option<RegistryView>,
    pub acceptance: Vec<AcceptanceDoc>,
    pub status_doc: Option<StatusDocument>,
    pub journal: Vec<JournalEntry>,
    pub sources: Vec<SourceFile>,
    pub annotations: Vec<CodeAnnotation>,
    pub docs: Vec<DocFile>,
    pub repo: Option<RepoSnapshot>,
}

impl Snapshot {
    /// Load all artifacts under `root`.
    pub fn load(root: &Path, config: DriftConfig) -> Self {
        let now = Utc::now();

        let registry = std::fs::read_to_string(root.join("spec").join("FEATURES.md"))
            .ok()
            .map(|text| {
                let (features, schema) = registry::parse(&text);
                RegistryView { features, schema }
            });

        let sources = sources::scan(root, &config.annotation_extensions);
        let annotations = annotations::extract(&sources);

        let widest = config
            .stale_feature_days
            .max(config.focus_window_days)
            .max(config.doc_stale_days);
        let cutoff = now - Duration::days(widest);
        let repo = RepoView::open(root).and_then(|view| view.snapshot(cutoff).ok());

        Self {
            root: root.to_path_buf(),
            config,
            now,
            registry,
            acceptance: acceptance::load_dir(root),
            status_doc: status_doc::load(root),
            journal: journal::load(root),
            sources,
            annotations,
            docs: docs::scan(root),
            repo,
        }
    }

    /// Registry features, empty when the registry is absent.
    pub fn features(&self) -> &[Feature] {
        self.registry
            .as_ref()
            .map(|r| r.features.as_slice())
            .unwrap_or(&[])
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.features().iter().find(|f| f.id == id)
    }

    pub fn acceptance_for(&self, feature_id: &str) -> Option<&AcceptanceDoc> {
        self.acceptance.iter().find(|d| d.feature_id == feature_id)
    }

    /// Path relative to the snapshot root, for issue reporting.
    pub fn rel_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }
}
