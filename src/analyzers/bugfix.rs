//! Bug-fix pattern analysis.
//!
//! Classifies every commit in the history (a message-only pass, cheap
//! enough that it is never sampled) and aggregates fixes by author, file,
//! and month. File attribution is whole-commit: a fix touching three files
//! adds one fix to each of them, not a third each.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::classify;
use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::git::{Commit, FileChange};

/// Bug-fix pattern analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    /// Create a new bug-fix analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "bugfix"
    }

    fn description(&self) -> &'static str {
        "Classify defect-fix commits and aggregate fix patterns"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let extra = &ctx.config.classify.extra_keywords;

        let mut fixes: Vec<(Commit, Vec<FileChange>)> = Vec::new();
        for commit in ctx.commits {
            if !classify::classify_with(&commit.message, extra).is_fix {
                continue;
            }
            // File attribution is best effort; an undiffable commit still
            // counts as a fix, it just attributes no files.
            let changes = match ctx.repo.diff_stats(commit) {
                Ok(changes) => changes,
                Err(e) => {
                    tracing::debug!(commit = commit.short_sha(), error = %e, "diff failed");
                    Vec::new()
                }
            };
            fixes.push((commit.clone(), changes));
        }

        let analysis = build_analysis(
            ctx.commits.len(),
            &fixes,
            ctx.config.report.top_fixers,
            ctx.config.report.top_buggy_files,
            ctx.config.report.recent_fixes,
        );

        tracing::info!(
            fixes = analysis.total_bug_fixes,
            rate = analysis.fix_rate,
            "bug-fix analysis complete"
        );
        Ok(analysis)
    }
}

/// Aggregate classified fixes into the report section.
///
/// `fixes` must be in chronological order (oldest first).
fn build_analysis(
    total_commits: usize,
    fixes: &[(Commit, Vec<FileChange>)],
    top_fixers: usize,
    top_files: usize,
    recent: usize,
) -> Analysis {
    let mut by_month: BTreeMap<String, u32> = BTreeMap::new();
    let mut files: HashMap<&str, u32> = HashMap::new();
    // author -> (fix count, timestamp of first fix)
    let mut authors: HashMap<&str, (u32, i64)> = HashMap::new();

    for (commit, changes) in fixes {
        *by_month.entry(commit.month_key()).or_insert(0) += 1;

        let entry = authors
            .entry(commit.author.as_str())
            .or_insert((0, commit.timestamp));
        entry.0 += 1;
        entry.1 = entry.1.min(commit.timestamp);

        for change in changes {
            *files.entry(change.path.as_str()).or_insert(0) += 1;
        }
    }

    let mut fixers: Vec<Fixer> = authors
        .into_iter()
        .map(|(author, (count, first_ts))| Fixer {
            author: author.to_string(),
            fixes: count,
            first_fix_timestamp: first_ts,
        })
        .collect();
    // Ties break by earliest first fix, then author name, so rankings are
    // stable across runs.
    fixers.sort_by(|a, b| {
        b.fixes
            .cmp(&a.fixes)
            .then(a.first_fix_timestamp.cmp(&b.first_fix_timestamp))
            .then(a.author.cmp(&b.author))
    });
    fixers.truncate(top_fixers);

    let mut buggy_files: Vec<BuggyFile> = files
        .into_iter()
        .map(|(file, count)| BuggyFile {
            file: file.to_string(),
            bug_fixes: count,
        })
        .collect();
    buggy_files.sort_by(|a, b| b.bug_fixes.cmp(&a.bug_fixes).then(a.file.cmp(&b.file)));
    buggy_files.truncate(top_files);

    let recent_bug_fixes: Vec<FixEntry> = fixes
        .iter()
        .rev()
        .take(recent)
        .map(|(commit, _)| FixEntry {
            hash: commit.short_sha().to_string(),
            author: commit.author.clone(),
            date: commit.datetime().format("%Y-%m-%d %H:%M").to_string(),
            message: commit.summary(),
        })
        .collect();

    let fix_rate = if total_commits > 0 {
        round2(fixes.len() as f64 / total_commits as f64 * 100.0)
    } else {
        0.0
    };

    Analysis {
        total_bug_fixes: fixes.len(),
        fix_rate,
        bug_fixes_by_month: by_month,
        top_bug_fixers: fixers,
        most_buggy_files: buggy_files,
        recent_bug_fixes,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bug-fix analysis section of the evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub total_bug_fixes: usize,
    /// Fixes as a percentage of all commits.
    pub fix_rate: f64,
    pub bug_fixes_by_month: BTreeMap<String, u32>,
    pub top_bug_fixers: Vec<Fixer>,
    pub most_buggy_files: Vec<BuggyFile>,
    /// Most recent fixes, newest first.
    pub recent_bug_fixes: Vec<FixEntry>,
}

/// One author's fix count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixer {
    pub author: String,
    pub fixes: u32,
    /// Unix timestamp of the author's earliest fix (ranking tie-break).
    pub first_fix_timestamp: i64,
}

/// Fix count attributed to one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuggyFile {
    pub file: String,
    pub bug_fixes: u32,
}

/// A single recent fix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixEntry {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(sha: &str, author: &str, timestamp: i64, message: &str) -> Commit {
        Commit {
            sha: sha.repeat(40 / sha.len().max(1)),
            author: author.to_string(),
            email: format!("{}@example.com", author.to_lowercase()),
            timestamp,
            message: message.to_string(),
        }
    }

    fn change(path: &str) -> FileChange {
        FileChange {
            path: path.to_string(),
            additions: 1,
            deletions: 0,
        }
    }

    // 2024-01-15 and 2024-02-20, both 09:00 UTC.
    const JAN: i64 = 1_705_309_200;
    const FEB: i64 = 1_708_419_600;

    #[test]
    fn test_build_analysis_empty() {
        let analysis = build_analysis(0, &[], 10, 10, 20);
        assert_eq!(analysis.total_bug_fixes, 0);
        assert_eq!(analysis.fix_rate, 0.0);
        assert!(analysis.top_bug_fixers.is_empty());
        assert!(analysis.most_buggy_files.is_empty());
        assert!(analysis.recent_bug_fixes.is_empty());
    }

    #[test]
    fn test_fix_rate() {
        let fixes = vec![(commit("a", "Alice", JAN, "fix crash"), vec![])];
        let analysis = build_analysis(3, &fixes, 10, 10, 20);
        assert_eq!(analysis.total_bug_fixes, 1);
        assert_eq!(analysis.fix_rate, 33.33);
    }

    #[test]
    fn test_file_attribution_is_whole_commit() {
        let fixes = vec![(
            commit("a", "Alice", JAN, "fix crash"),
            vec![change("a.rs"), change("b.rs"), change("c.rs")],
        )];
        let analysis = build_analysis(1, &fixes, 10, 10, 20);
        assert_eq!(analysis.most_buggy_files.len(), 3);
        for file in &analysis.most_buggy_files {
            assert_eq!(file.bug_fixes, 1);
        }
    }

    #[test]
    fn test_fixer_ranking_tie_breaks_on_first_fix() {
        // Bob and Alice both have one fix; Bob's is earlier, so Bob ranks
        // first despite sorting after Alice alphabetically.
        let fixes = vec![
            (commit("b", "Bob", JAN, "fix one"), vec![]),
            (commit("a", "Alice", FEB, "fix two"), vec![]),
        ];
        let analysis = build_analysis(2, &fixes, 10, 10, 20);
        assert_eq!(analysis.top_bug_fixers[0].author, "Bob");
        assert_eq!(analysis.top_bug_fixers[1].author, "Alice");
    }

    #[test]
    fn test_monthly_histogram_sorted() {
        let fixes = vec![
            (commit("a", "Alice", JAN, "fix one"), vec![]),
            (commit("b", "Bob", FEB, "fix two"), vec![]),
            (commit("c", "Alice", FEB, "fix three"), vec![]),
        ];
        let analysis = build_analysis(3, &fixes, 10, 10, 20);
        let months: Vec<&String> = analysis.bug_fixes_by_month.keys().collect();
        assert_eq!(months, ["2024-01", "2024-02"]);
        assert_eq!(analysis.bug_fixes_by_month["2024-02"], 2);
    }

    #[test]
    fn test_recent_fixes_newest_first() {
        let fixes = vec![
            (commit("a", "Alice", JAN, "fix old"), vec![]),
            (commit("b", "Bob", FEB, "fix new"), vec![]),
        ];
        let analysis = build_analysis(2, &fixes, 10, 10, 1);
        assert_eq!(analysis.recent_bug_fixes.len(), 1);
        assert_eq!(analysis.recent_bug_fixes[0].message, "fix new");
        assert_eq!(analysis.recent_bug_fixes[0].date, "2024-02-20 09:00");
    }

    #[test]
    fn test_author_identity_not_merged() {
        // Same human, differently formatted names: two separate buckets.
        let fixes = vec![
            (commit("a", "Alice", JAN, "fix one"), vec![]),
            (commit("b", "alice", FEB, "fix two"), vec![]),
        ];
        let analysis = build_analysis(2, &fixes, 10, 10, 20);
        assert_eq!(analysis.top_bug_fixers.len(), 2);
    }
}
