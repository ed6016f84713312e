//! Complexity evolution tracking.
//!
//! For each sampled commit, parses the source files present in that
//! commit's tree and averages a branching-based complexity score (decision
//! points per file) into one scalar, producing a trend over time. A file
//! that cannot be read or parsed at a revision is counted as unparseable
//! and skipped; a sampled commit with zero parseable files produces no
//! trend point at all rather than a misleading zero.
//!
//! The score is a structural proxy, not a code-quality verdict.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Language, Result};
use crate::git::{Commit, GitRepo};
use crate::parser::{count_decision_points, Parser};
use crate::sample::sample;

/// Files larger than this are skipped as likely generated or minified.
const MAX_FILE_SIZE: usize = 1_000_000;

/// Complexity evolution tracker.
pub struct Analyzer {
    parser: Parser,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create a new complexity tracker.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }

    /// Analyze one commit; `None` when it has no parseable source files.
    fn commit_point(&self, repo: &GitRepo, commit: &Commit) -> Result<Option<TrendPoint>> {
        let mut unparseable = 0usize;

        let mut sources: Vec<(String, Language, Vec<u8>)> = Vec::new();
        for path in repo.files_at(commit)? {
            let Some(lang) = Language::detect(Path::new(&path)) else {
                continue;
            };
            match repo.file_content(commit, &path) {
                Ok(content) if content.len() <= MAX_FILE_SIZE => {
                    sources.push((path, lang, content));
                }
                Ok(_) | Err(_) => unparseable += 1,
            }
        }

        // Contents are owned at this point, so the per-file parse can fan
        // out without touching the repository handle.
        let parsed: Vec<Option<(u32, usize)>> = sources
            .par_iter()
            .map(|(path, lang, content)| {
                self.parser
                    .parse(content, *lang, Path::new(path))
                    .ok()
                    .map(|result| {
                        let lines = String::from_utf8_lossy(content).lines().count();
                        (count_decision_points(&result), lines)
                    })
            })
            .collect();

        unparseable += parsed.iter().filter(|p| p.is_none()).count();
        let scores: Vec<(u32, usize)> = parsed.into_iter().flatten().collect();
        if scores.is_empty() {
            return Ok(None);
        }

        let total_decisions: u32 = scores.iter().map(|(d, _)| d).sum();
        let total_lines: usize = scores.iter().map(|(_, l)| l).sum();
        let avg_complexity = round2(f64::from(total_decisions) / scores.len() as f64);

        Ok(Some(TrendPoint {
            commit: commit.short_sha().to_string(),
            date: commit.day_key(),
            timestamp: commit.timestamp,
            avg_complexity,
            file_count: scores.len(),
            total_lines,
            unparseable_files: unparseable,
        }))
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "complexity"
    }

    fn description(&self) -> &'static str {
        "Track average source complexity across sampled commits"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let target = ctx.config.sampling.complexity;
        let sampled = ctx.commits.len() > target;
        let commits = if sampled {
            sample(ctx.commits, target)
        } else {
            ctx.commits.to_vec()
        };

        let mut points = Vec::with_capacity(commits.len());
        for (i, commit) in commits.iter().enumerate() {
            ctx.report_progress(i + 1, commits.len());
            match self.commit_point(ctx.repo, commit) {
                Ok(Some(point)) => points.push(point),
                Ok(None) => {}
                Err(e) => {
                    // One broken revision is skipped, the trend continues.
                    tracing::debug!(commit = commit.short_sha(), error = %e, "revision skipped");
                }
            }
        }

        tracing::info!(
            points = points.len(),
            analyzed = commits.len(),
            sampled,
            "complexity analysis complete"
        );

        Ok(Analysis {
            sampled,
            analyzed_commits: commits.len(),
            points,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Complexity evolution section of the evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// True when the history was sampled down before this pass.
    pub sampled: bool,
    pub analyzed_commits: usize,
    /// Chronologically ordered trend points.
    pub points: Vec<TrendPoint>,
}

/// Average complexity at one sampled commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub commit: String,
    pub date: String,
    pub timestamp: i64,
    /// Mean decision points per parseable source file.
    pub avg_complexity: f64,
    pub file_count: usize,
    pub total_lines: usize,
    pub unparseable_files: usize,
}
