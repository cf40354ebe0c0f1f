use thiserror::Error;

/// Failure taxonomy for artifact access and repair.
///
/// Most of these never surface to the user: a missing artifact skips its
/// checks, an ambiguous schema falls back to a default, and a fix conflict
/// aborts only that fix. The run itself always resolves to a deterministic
/// clean/issues exit.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("artifact not found: {0}")]
    MissingArtifact(String),
    #[error("could not determine registry schema for {0}")]
    ParseAmbiguity(String),
    #[error("fix target changed or vanished: {0}")]
    FixConflict(String),
    #[error("not inside a version-controlled directory")]
    EnvironmentUnavailable,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Git(#[from] git2::Error),
}
