//! Git repository access for history mining.
//!
//! Every operation here is read-only. The accessor keeps no mutable state
//! across calls, so analyzers can share one handle and call it repeatedly.
//! Diff stats are always computed against a commit's *first* parent; merge
//! commits with multiple parents use the first parent only.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, TimeZone, Utc};
use git2::{DiffOptions, ObjectType, Oid, Patch, Repository, Sort, TreeWalkMode, TreeWalkResult};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// A commit record.
///
/// Carries metadata only. Changed-file stats are fetched separately through
/// [`GitRepo::diff_stats`] so that message-only passes stay cheap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit SHA.
    pub sha: String,
    /// Author name, exactly as recorded in the commit.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Authored timestamp (unix seconds).
    pub timestamp: i64,
    /// Full commit message.
    pub message: String,
}

impl Commit {
    /// Short (8 hex chars) form of the SHA for display.
    pub fn short_sha(&self) -> &str {
        &self.sha[..self.sha.len().min(8)]
    }

    /// Authored time as a UTC datetime.
    pub fn datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.timestamp, 0)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// First line of the message, truncated to 100 characters.
    pub fn summary(&self) -> String {
        let first_line = self.message.trim().lines().next().unwrap_or("");
        first_line.chars().take(100).collect()
    }

    /// Day bucket key, `YYYY-MM-DD`.
    pub fn day_key(&self) -> String {
        self.datetime().format("%Y-%m-%d").to_string()
    }

    /// Month bucket key, `YYYY-MM`.
    pub fn month_key(&self) -> String {
        self.datetime().format("%Y-%m").to_string()
    }

    /// ISO week bucket key, `YYYY-Www`.
    pub fn week_key(&self) -> String {
        let week = self.datetime().iso_week();
        format!("{}-W{:02}", week.year(), week.week())
    }
}

/// Per-file added/deleted line counts for one commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    /// File path, exactly as git reports it.
    pub path: String,
    /// Lines added.
    pub additions: u32,
    /// Lines deleted.
    pub deletions: u32,
}

/// Read-only git repository wrapper.
pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a git repository at the given path.
    ///
    /// Fails with [`Error::NotARepository`] when the path carries no git
    /// metadata.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| Error::not_a_repository(path))?;
        Ok(Self {
            repo,
            path: path.to_path_buf(),
        })
    }

    /// Path the repository was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Enumerate commits reachable from HEAD, newest first.
    ///
    /// Each call re-walks the graph, so the sequence is restartable.
    /// `limit` caps the count for cheap previews.
    pub fn commits(&self, limit: Option<usize>) -> Result<Vec<Commit>> {
        if self.repo.is_empty()? {
            return Ok(Vec::new());
        }

        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        walk.set_sorting(Sort::TIME)?;

        let mut commits = Vec::new();
        for oid in walk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(to_record(&commit));
            if limit.is_some_and(|n| commits.len() >= n) {
                break;
            }
        }
        Ok(commits)
    }

    /// Full history, oldest first.
    pub fn commits_chronological(&self) -> Result<Vec<Commit>> {
        let mut commits = self.commits(None)?;
        commits.reverse();
        Ok(commits)
    }

    /// Per-file added/deleted line counts against the commit's first parent.
    ///
    /// The root commit diffs against the empty tree. Binary files report
    /// zero line counts.
    pub fn diff_stats(&self, commit: &Commit) -> Result<Vec<FileChange>> {
        let commit = self.find(commit)?;
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let mut opts = DiffOptions::new();
        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        let mut changes = Vec::new();
        for (idx, delta) in diff.deltas().enumerate() {
            let path = match delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .and_then(|p| p.to_str())
            {
                Some(p) => p.to_string(),
                None => continue,
            };

            let (additions, deletions) = match Patch::from_diff(&diff, idx)? {
                Some(patch) => {
                    let (_context, additions, deletions) = patch.line_stats()?;
                    (additions as u32, deletions as u32)
                }
                None => (0, 0),
            };

            changes.push(FileChange {
                path,
                additions,
                deletions,
            });
        }
        Ok(changes)
    }

    /// Raw content of a file at the given commit.
    ///
    /// Fails with [`Error::FileNotFoundAtRevision`] when the path did not
    /// exist in that commit's tree.
    pub fn file_content(&self, commit: &Commit, path: &str) -> Result<Vec<u8>> {
        let not_found = || Error::FileNotFoundAtRevision {
            path: PathBuf::from(path),
            commit: commit.short_sha().to_string(),
        };

        let found = self.find(commit)?;
        let tree = found.tree()?;
        let entry = tree.get_path(Path::new(path)).map_err(|_| not_found())?;
        let object = entry.to_object(&self.repo)?;
        let blob = object.as_blob().ok_or_else(not_found)?;
        Ok(blob.content().to_vec())
    }

    /// All blob paths present in the commit's tree.
    pub fn files_at(&self, commit: &Commit) -> Result<Vec<String>> {
        let commit = self.find(commit)?;
        let tree = commit.tree()?;

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push(format!("{root}{name}"));
                }
            }
            TreeWalkResult::Ok
        })?;
        Ok(files)
    }

    fn find(&self, commit: &Commit) -> Result<git2::Commit<'_>> {
        let oid = Oid::from_str(&commit.sha)
            .map_err(|e| Error::git(format!("Invalid commit id {}: {e}", commit.sha)))?;
        Ok(self.repo.find_commit(oid)?)
    }
}

fn to_record(commit: &git2::Commit<'_>) -> Commit {
    let author = commit.author();
    Commit {
        sha: commit.id().to_string(),
        author: author.name().unwrap_or("Unknown").to_string(),
        email: author.email().unwrap_or("").to_string(),
        timestamp: commit.time().seconds(),
        message: commit.message().unwrap_or("").to_string(),
    }
}
