//! The rule engine.
//!
//! Each check is an independent, idempotent function from one [`Snapshot`]
//! to a list of [`DriftIssue`]s. Checks declare the artifacts they need so
//! the orchestrator can skip them silently when a source is absent, and
//! whether any of their issue kinds supports an automated fix. Registration
//! order in [`all`] is the fixed execution order.

mod completeness;
mod docs;
mod hygiene;
mod orphans;
mod staleness;

use anyhow::Result;

use crate::models::DriftIssue;
use crate::readers::Snapshot;

pub use completeness::{PendingButActiveCheck, ShippedCompletenessCheck};
pub use docs::{DocumentationDriftCheck, UndocumentedEndpointCheck, UndocumentedExportCheck};
pub use hygiene::{HookPathCheck, TemplateMarkerCheck, UntrackedFileCheck};
pub use orphans::{MissingAnnotationCheck, OrphanedAcceptanceCheck, OrphanedAnnotationCheck};
pub use staleness::{StaleInProgressCheck, StatusFocusStalenessCheck};

/// The artifacts a check reads. The orchestrator skips a check silently when
/// a needed optional artifact (registry, status document, repository) is not
/// present in the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Needs {
    pub registry: bool,
    pub acceptance: bool,
    pub status_doc: bool,
    pub repo: bool,
    pub annotations: bool,
    pub docs: bool,
}

pub trait Check {
    fn name(&self) -> &'static str;

    fn needs(&self) -> Needs;

    /// Whether any issue kind this check emits has an automated fix.
    fn supports_fix(&self) -> bool {
        false
    }

    /// Expensive correlations are skipped in quiet mode.
    fn expensive(&self) -> bool {
        false
    }

    /// Whether this check belongs to the documentation scope (`--docs`).
    fn doc_scope(&self) -> bool {
        false
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>>;
}

/// Every check, in the fixed, deterministic execution order.
pub fn all() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(ShippedCompletenessCheck),
        Box::new(PendingButActiveCheck),
        Box::new(StaleInProgressCheck),
        Box::new(OrphanedAcceptanceCheck),
        Box::new(OrphanedAnnotationCheck),
        Box::new(MissingAnnotationCheck),
        Box::new(StatusFocusStalenessCheck),
        Box::new(UntrackedFileCheck),
        Box::new(HookPathCheck),
        Box::new(TemplateMarkerCheck),
        Box::new(DocumentationDriftCheck),
        Box::new(UndocumentedExportCheck),
        Box::new(UndocumentedEndpointCheck),
    ]
}

/// Whether the snapshot carries everything the check declared it needs.
pub fn runnable(check: &dyn Check, snapshot: &Snapshot) -> bool {
    let needs = check.needs();
    if needs.registry && snapshot.registry.is_none() {
        return false;
    }
    if needs.status_doc && snapshot.status_doc.is_none() {
        return false;
    }
    if needs.repo && snapshot.repo.is_none() {
        return false;
    }
    true
}
