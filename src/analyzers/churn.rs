//! Code churn analysis.
//!
//! Churn is additions plus deletions (not net) per file, a volatility
//! proxy. The analyzer aggregates a per-day timeline and a high-churn file
//! ranking. Histories above the configured sampling target are sampled
//! first; `sampled` is carried in the section so the totals are not
//! mistaken for exact whole-history numbers.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::git::{Commit, FileChange};
use crate::sample::sample;

/// Churn analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    /// Create a new churn analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "churn"
    }

    fn description(&self) -> &'static str {
        "Aggregate per-day churn and rank high-churn files"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let target = ctx.config.sampling.churn;
        let sampled = ctx.commits.len() > target;
        let commits = if sampled {
            sample(ctx.commits, target)
        } else {
            ctx.commits.to_vec()
        };

        let mut per_commit: Vec<(Commit, Vec<FileChange>)> = Vec::with_capacity(commits.len());
        for commit in commits {
            match ctx.repo.diff_stats(&commit) {
                Ok(changes) => per_commit.push((commit, changes)),
                Err(e) => {
                    // One undiffable commit must not sink the whole pass.
                    tracing::debug!(commit = commit.short_sha(), error = %e, "diff failed");
                }
            }
        }

        let analysis = build_analysis(&per_commit, sampled, ctx.config.report.top_churn_files);
        tracing::info!(
            commits = analysis.analyzed_commits,
            files = analysis.high_churn_files.len(),
            sampled,
            "churn analysis complete"
        );
        Ok(analysis)
    }
}

/// Aggregate per-commit diff stats into the churn section.
fn build_analysis(
    per_commit: &[(Commit, Vec<FileChange>)],
    sampled: bool,
    top_files: usize,
) -> Analysis {
    let mut timeline: BTreeMap<String, DayChurn> = BTreeMap::new();
    // path -> (additions, deletions, change events)
    let mut file_churn: HashMap<&str, (u64, u64, u32)> = HashMap::new();

    for (commit, changes) in per_commit {
        if changes.is_empty() {
            continue;
        }

        let day = timeline.entry(commit.day_key()).or_default();
        for change in changes {
            day.additions += u64::from(change.additions);
            day.deletions += u64::from(change.deletions);

            let entry = file_churn.entry(change.path.as_str()).or_insert((0, 0, 0));
            entry.0 += u64::from(change.additions);
            entry.1 += u64::from(change.deletions);
            entry.2 += 1;
        }
        day.files_changed += changes.len() as u32;
        day.net_change = day.additions as i64 - day.deletions as i64;
    }

    let mut high_churn_files: Vec<FileChurn> = file_churn
        .into_iter()
        .map(|(file, (additions, deletions, change_count))| FileChurn {
            file: file.to_string(),
            total_churn: additions + deletions,
            additions,
            deletions,
            change_count,
        })
        .collect();
    high_churn_files.sort_by(|a, b| {
        b.total_churn
            .cmp(&a.total_churn)
            .then(a.file.cmp(&b.file))
    });
    high_churn_files.truncate(top_files);

    // Totals are sums over the timeline, so they stay consistent with it by
    // construction.
    let total_additions = timeline.values().map(|d| d.additions).sum();
    let total_deletions = timeline.values().map(|d| d.deletions).sum();

    Analysis {
        sampled,
        analyzed_commits: per_commit.len(),
        total_additions,
        total_deletions,
        churn_timeline: timeline,
        high_churn_files,
    }
}

/// Churn section of the evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// True when the history was sampled down before this pass.
    pub sampled: bool,
    pub analyzed_commits: usize,
    pub total_additions: u64,
    pub total_deletions: u64,
    /// Per-day aggregates keyed by `YYYY-MM-DD`; same-day commits are summed.
    pub churn_timeline: BTreeMap<String, DayChurn>,
    pub high_churn_files: Vec<FileChurn>,
}

/// One day of aggregated churn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayChurn {
    pub additions: u64,
    pub deletions: u64,
    pub net_change: i64,
    pub files_changed: u32,
}

/// Total churn attributed to one file across the analyzed range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChurn {
    pub file: String,
    pub total_churn: u64,
    pub additions: u64,
    pub deletions: u64,
    pub change_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, timestamp: i64) -> Commit {
        Commit {
            sha: sha.repeat(40 / sha.len().max(1)),
            author: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            timestamp,
            message: "change".to_string(),
        }
    }

    fn change(path: &str, additions: u32, deletions: u32) -> FileChange {
        FileChange {
            path: path.to_string(),
            additions,
            deletions,
        }
    }

    // 2024-01-15 at 09:00 and 18:00 UTC, 2024-01-16 at 09:00 UTC.
    const DAY1_AM: i64 = 1_705_309_200;
    const DAY1_PM: i64 = 1_705_341_600;
    const DAY2: i64 = 1_705_395_600;

    #[test]
    fn test_build_analysis_empty() {
        let analysis = build_analysis(&[], false, 20);
        assert_eq!(analysis.analyzed_commits, 0);
        assert_eq!(analysis.total_additions, 0);
        assert!(analysis.churn_timeline.is_empty());
        assert!(analysis.high_churn_files.is_empty());
    }

    #[test]
    fn test_single_file_three_changes() {
        // Additions {10, 5, 2}, deletions {1, 0, 3} -> churn 21, 3 events.
        let per_commit = vec![
            (commit("a", DAY1_AM), vec![change("src/lib.rs", 10, 1)]),
            (commit("b", DAY1_PM), vec![change("src/lib.rs", 5, 0)]),
            (commit("c", DAY2), vec![change("src/lib.rs", 2, 3)]),
        ];
        let analysis = build_analysis(&per_commit, false, 20);

        assert_eq!(analysis.high_churn_files.len(), 1);
        let file = &analysis.high_churn_files[0];
        assert_eq!(file.file, "src/lib.rs");
        assert_eq!(file.total_churn, 21);
        assert_eq!(file.additions, 17);
        assert_eq!(file.deletions, 4);
        assert_eq!(file.change_count, 3);
    }

    #[test]
    fn test_same_day_commits_are_summed() {
        let per_commit = vec![
            (commit("a", DAY1_AM), vec![change("a.rs", 10, 2)]),
            (commit("b", DAY1_PM), vec![change("b.rs", 3, 1)]),
            (commit("c", DAY2), vec![change("a.rs", 1, 1)]),
        ];
        let analysis = build_analysis(&per_commit, false, 20);

        assert_eq!(analysis.churn_timeline.len(), 2);
        let day1 = &analysis.churn_timeline["2024-01-15"];
        assert_eq!(day1.additions, 13);
        assert_eq!(day1.deletions, 3);
        assert_eq!(day1.net_change, 10);
        assert_eq!(day1.files_changed, 2);
    }

    #[test]
    fn test_totals_match_timeline_sums() {
        let per_commit = vec![
            (commit("a", DAY1_AM), vec![change("a.rs", 10, 2), change("b.rs", 4, 4)]),
            (commit("b", DAY2), vec![change("a.rs", 7, 0)]),
        ];
        let analysis = build_analysis(&per_commit, false, 20);

        let timeline_additions: u64 = analysis.churn_timeline.values().map(|d| d.additions).sum();
        let timeline_deletions: u64 = analysis.churn_timeline.values().map(|d| d.deletions).sum();
        assert_eq!(analysis.total_additions, timeline_additions);
        assert_eq!(analysis.total_deletions, timeline_deletions);
        assert_eq!(analysis.total_additions, 21);
        assert_eq!(analysis.total_deletions, 6);
    }

    #[test]
    fn test_ranking_sorted_by_total_churn() {
        let per_commit = vec![
            (commit("a", DAY1_AM), vec![change("small.rs", 1, 0)]),
            (commit("b", DAY1_PM), vec![change("big.rs", 50, 30)]),
        ];
        let analysis = build_analysis(&per_commit, false, 20);
        assert_eq!(analysis.high_churn_files[0].file, "big.rs");
        assert_eq!(analysis.high_churn_files[1].file, "small.rs");
    }

    #[test]
    fn test_top_files_cap() {
        let per_commit = vec![(
            commit("a", DAY1_AM),
            (0..30)
                .map(|i| change(&format!("f{i}.rs"), i + 1, 0))
                .collect(),
        )];
        let analysis = build_analysis(&per_commit, false, 20);
        assert_eq!(analysis.high_churn_files.len(), 20);
    }

    #[test]
    fn test_empty_diffs_skipped() {
        let per_commit = vec![(commit("a", DAY1_AM), vec![])];
        let analysis = build_analysis(&per_commit, false, 20);
        assert!(analysis.churn_timeline.is_empty());
    }
}
