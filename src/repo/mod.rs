//! Version-control access.
//!
//! Read operations (log, status, changed paths) are always safe to run
//! concurrently with other tooling. The only write operations are the two
//! SAFE fixes: staging a path and setting `core.hooksPath`, both idempotent.
//! A directory that is not version-controlled yields no [`RepoView`] at all;
//! git-dependent checks are then skipped silently.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use git2::{Delta, Repository, Sort, StatusOptions};
use serde::{Deserialize, Serialize};

/// One commit within the observation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitCommit {
    pub hash: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub files_added: usize,
    pub files_removed: usize,
}

/// The immutable repository data a run observes, captured once per snapshot
/// so every check sees the same state.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    /// Commits newer than the widest configured window, newest first.
    pub commits: Vec<GitCommit>,
    /// Untracked paths, relative to the workdir.
    pub untracked: Vec<String>,
    /// Paths with uncommitted modifications (index or worktree).
    pub dirty: Vec<String>,
    /// Paths touched by `commits`, with the newest commit time that touched them.
    pub changed_files: Vec<(String, DateTime<Utc>)>,
    /// The configured `core.hooksPath`, if any.
    pub hooks_path: Option<String>,
}

impl RepoSnapshot {
    pub fn commits_since(&self, cutoff: DateTime<Utc>) -> impl Iterator<Item = &GitCommit> {
        self.commits.iter().filter(move |c| c.timestamp >= cutoff)
    }

    /// Whether the path was committed to after the cutoff or currently has
    /// uncommitted edits.
    pub fn changed_since(&self, path: &str, cutoff: DateTime<Utc>) -> bool {
        self.changed_files
            .iter()
            .any(|(p, t)| p == path && *t >= cutoff)
            || self.dirty.iter().any(|p| p == path)
            || self.untracked.iter().any(|p| p == path)
    }
}

/// Handle on the repository for snapshot capture and the two SAFE mutations.
pub struct RepoView {
    repo: Repository,
}

impl RepoView {
    /// Discover the repository containing `root`. `None` outside version
    /// control — never an error.
    pub fn open(root: &Path) -> Option<Self> {
        Repository::discover(root).ok().map(|repo| Self { repo })
    }

    /// Capture everything the checks will read, bounded by `cutoff`.
    pub fn snapshot(&self, cutoff: DateTime<Utc>) -> Result<RepoSnapshot> {
        let (untracked, dirty) = self.working_state()?;
        let (commits, changed_files) = self.history_since(cutoff)?;

        Ok(RepoSnapshot {
            commits,
            untracked,
            dirty,
            changed_files,
            hooks_path: self.hooks_path(),
        })
    }

    fn working_state(&self) -> Result<(Vec<String>, Vec<String>)> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut untracked = Vec::new();
        let mut dirty = Vec::new();

        for entry in statuses.iter() {
            let Some(path) = entry.path() else { continue };
            let s = entry.status();
            if s.is_wt_new() {
                untracked.push(path.to_string());
            } else if s.is_wt_modified()
                || s.is_wt_renamed()
                || s.is_index_new()
                || s.is_index_modified()
                || s.is_index_renamed()
            {
                dirty.push(path.to_string());
            }
        }
        untracked.sort();
        dirty.sort();
        Ok((untracked, dirty))
    }

    fn history_since(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<(Vec<GitCommit>, Vec<(String, DateTime<Utc>)>)> {
        let mut commits = Vec::new();
        let mut changed: Vec<(String, DateTime<Utc>)> = Vec::new();

        // An unborn HEAD (fresh repo, no commits) is empty history, not an error.
        let mut walk = match self.repo.revwalk() {
            Ok(w) => w,
            Err(_) => return Ok((commits, changed)),
        };
        if walk.push_head().is_err() {
            return Ok((commits, changed));
        }
        walk.set_sorting(Sort::TIME)?;

        for oid in walk.flatten() {
            let commit = self.repo.find_commit(oid)?;
            let timestamp = Utc
                .timestamp_opt(commit.time().seconds(), 0)
                .single()
                .unwrap_or_else(Utc::now);
            if timestamp < cutoff {
                break;
            }

            let tree = commit.tree()?;
            let parent_tree = commit.parent(0).ok().map(|p| p.tree()).transpose()?;
            let diff = self
                .repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;

            let mut files_added = 0;
            let mut files_removed = 0;
            for delta in diff.deltas() {
                match delta.status() {
                    Delta::Added => files_added += 1,
                    Delta::Deleted => files_removed += 1,
                    _ => {}
                }
                if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                    let path = path.to_string_lossy().to_string();
                    match changed.iter_mut().find(|(p, _)| *p == path) {
                        // Walk is newest-first; keep the newest touch time.
                        Some((_, t)) => *t = (*t).max(timestamp),
                        None => changed.push((path, timestamp)),
                    }
                }
            }

            commits.push(GitCommit {
                hash: oid.to_string(),
                timestamp,
                message: commit.message().unwrap_or("").to_string(),
                files_added,
                files_removed,
            });
        }

        changed.sort_by(|a, b| a.0.cmp(&b.0));
        Ok((commits, changed))
    }

    fn hooks_path(&self) -> Option<String> {
        self.repo
            .config()
            .ok()?
            .get_string("core.hooksPath")
            .ok()
            .filter(|s| !s.is_empty())
    }

    // ── SAFE mutations ──────────────────────────────────────────────────────

    /// Stage one path. A no-op when the path is already staged; an error when
    /// the path no longer exists (the caller reports a fix conflict).
    pub fn stage(&self, rel_path: &str) -> Result<(), git2::Error> {
        let mut index = self.repo.index()?;
        index.add_path(Path::new(rel_path))?;
        index.write()
    }

    /// Point `core.hooksPath` at the given directory. Idempotent.
    pub fn set_hooks_path(&self, value: &str) -> Result<(), git2::Error> {
        self.repo.config()?.set_str("core.hooksPath", value)
    }
}
