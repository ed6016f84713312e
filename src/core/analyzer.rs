//! Analyzer trait and shared analysis context.

use serde::Serialize;

use super::Result;
use crate::config::Config;
use crate::git::{Commit, GitRepo};

/// Trait implemented by all evolution analyzers.
pub trait Analyzer {
    /// The result type produced by this analyzer.
    type Output: Serialize;

    /// Unique identifier for this analyzer.
    fn name(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str;

    /// Run analysis and return results.
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output>;
}

/// Context shared by all analyzers during one run.
///
/// Holds the repository handle and the full history (oldest first) so that
/// each analyzer makes its own pass without re-walking the commit graph.
pub struct AnalysisContext<'a> {
    /// The repository being analyzed.
    pub repo: &'a GitRepo,
    /// Full commit history, chronological (oldest first).
    pub commits: &'a [Commit],
    /// Configuration.
    pub config: &'a Config,
    /// Progress callback for long passes.
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync + 'a>>,
}

impl<'a> AnalysisContext<'a> {
    /// Create a new analysis context.
    pub fn new(repo: &'a GitRepo, commits: &'a [Commit], config: &'a Config) -> Self {
        Self {
            repo,
            commits,
            config,
            on_progress: None,
        }
    }

    /// Add progress callback.
    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'a,
    {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Report progress if a callback is set.
    pub fn report_progress(&self, current: usize, total: usize) {
        if let Some(ref f) = self.on_progress {
            f(current, total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, GitRepo) {
        let temp = tempfile::tempdir().unwrap();
        git2::Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        (temp, repo)
    }

    #[test]
    fn test_context_new() {
        let (_temp, repo) = fixture();
        let config = Config::default();
        let commits: Vec<Commit> = Vec::new();
        let ctx = AnalysisContext::new(&repo, &commits, &config);
        assert!(ctx.on_progress.is_none());
        // Should not panic without a callback.
        ctx.report_progress(1, 10);
    }

    #[test]
    fn test_context_with_progress() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (_temp, repo) = fixture();
        let config = Config::default();
        let commits: Vec<Commit> = Vec::new();
        let seen = AtomicUsize::new(0);

        let ctx = AnalysisContext::new(&repo, &commits, &config)
            .with_progress(|current, _total| seen.store(current, Ordering::SeqCst));
        ctx.report_progress(42, 100);
        drop(ctx);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
