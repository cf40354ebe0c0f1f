//! Cross-reference checks between the registry, acceptance files, and code
//! annotations.

use anyhow::Result;

use crate::models::{DriftIssue, FeatureStatus, IssueKind};
use crate::readers::Snapshot;

use super::{Check, Needs};

/// An acceptance file whose feature id has no registry entry.
pub struct OrphanedAcceptanceCheck;

impl Check for OrphanedAcceptanceCheck {
    fn name(&self) -> &'static str {
        "orphaned_acceptance"
    }

    fn needs(&self) -> Needs {
        Needs {
            registry: true,
            acceptance: true,
            ..Default::default()
        }
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let mut issues = Vec::new();

        for doc in &snapshot.acceptance {
            if snapshot.feature(&doc.feature_id).is_some() {
                continue;
            }
            let file = snapshot.rel_path(&doc.path);
            issues.push(
                DriftIssue::new(
                    IssueKind::OrphanedAcceptance,
                    format!(
                        "{file} exists but {} has no entry in the feature registry",
                        doc.feature_id
                    ),
                )
                .with_feature(&doc.feature_id)
                .with_file(file.clone()),
            );
        }

        Ok(issues)
    }
}

/// A code annotation referencing a feature the registry does not know.
pub struct OrphanedAnnotationCheck;

impl Check for OrphanedAnnotationCheck {
    fn name(&self) -> &'static str {
        "orphaned_annotation"
    }

    fn needs(&self) -> Needs {
        Needs {
            registry: true,
            annotations: true,
            ..Default::default()
        }
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let mut issues = Vec::new();

        for annotation in &snapshot.annotations {
            if snapshot.feature(&annotation.feature_id).is_some() {
                continue;
            }
            issues.push(
                DriftIssue::new(
                    IssueKind::OrphanedAnnotation,
                    format!(
                        "@feature {} in {} but the feature is not in the registry",
                        annotation.feature_id, annotation.file
                    ),
                )
                .with_feature(&annotation.feature_id)
                .with_file(&annotation.file),
            );
        }

        Ok(issues)
    }
}

/// A feature past the planning stage that no source file claims to implement.
/// Deprecated features are exempt: their annotations are often removed with
/// the code.
pub struct MissingAnnotationCheck;

impl Check for MissingAnnotationCheck {
    fn name(&self) -> &'static str {
        "missing_annotation"
    }

    fn needs(&self) -> Needs {
        Needs {
            registry: true,
            annotations: true,
            ..Default::default()
        }
    }

    fn run(&self, snapshot: &Snapshot) -> Result<Vec<DriftIssue>> {
        let mut issues = Vec::new();

        for feature in snapshot.features() {
            if matches!(
                feature.status,
                FeatureStatus::Planned | FeatureStatus::Deprecated
            ) {
                continue;
            }
            let annotated = snapshot
                .annotations
                .iter()
                .any(|a| a.feature_id == feature.id);
            if annotated {
                continue;
            }
            issues.push(
                DriftIssue::new(
                    IssueKind::MissingAnnotation,
                    format!(
                        "{}: status is '{}' but no source file carries an @feature annotation for it",
                        feature.id,
                        feature.status.as_str()
                    ),
                )
                .with_feature(&feature.id)
                .with_extra("status", feature.status.as_str()),
            );
        }

        Ok(issues)
    }
}
