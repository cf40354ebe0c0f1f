//! Drift detection and repair for living project documentation.
//!
//! A project's artifacts — the feature registry, per-feature acceptance
//! checklists, the status document, the session journal, `@feature` source
//! annotations, and version-control history — are expected to stay mutually
//! consistent. This crate reads them all into one [`readers::Snapshot`],
//! runs a fixed-order rule engine over it, and either reports the detected
//! drift or applies the bounded set of safe, reversible repairs.
//!
//! The two binaries, `drift` and `sync`, are thin wrappers over
//! [`engine::run`].

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixes;
pub mod models;
pub mod readers;
pub mod repo;
pub mod report;

pub use error::ArtifactError;
pub use models::*;
