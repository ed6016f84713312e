//! Contributor evolution analysis.
//!
//! Tracks month by month how many distinct authors are active, newly seen,
//! and cumulative, plus per-contributor activity spans. The monthly
//! timeline runs from the first to the last commit month with zero-commit
//! months present, so downstream consumers never see gaps.
//!
//! Contributor identity is the exact author name string from the commit;
//! differently formatted names for the same person stay separate buckets.
//! That is a documented limitation of name-based identity, not a defect.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::git::Commit;

/// Contributor evolution analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    /// Create a new contributor analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "contributors"
    }

    fn description(&self) -> &'static str {
        "Track monthly contributor activity, growth, and spans"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let analysis = build_analysis(ctx.commits, ctx.config.report.top_contributors);
        tracing::info!(
            contributors = analysis.total_contributors,
            months = analysis.contributor_evolution.len(),
            "contributor analysis complete"
        );
        Ok(analysis)
    }
}

#[derive(Default)]
struct ContributorAcc {
    commits: u32,
    first_ts: i64,
    last_ts: i64,
    days: BTreeSet<NaiveDate>,
}

/// Build the contributor section from the chronological history.
fn build_analysis(commits: &[Commit], top_contributors: usize) -> Analysis {
    // month key -> authors active that month
    let mut monthly: BTreeMap<(i32, u32), HashSet<&str>> = BTreeMap::new();
    let mut per_author: HashMap<&str, ContributorAcc> = HashMap::new();

    for commit in commits {
        let dt = commit.datetime();
        monthly
            .entry((dt.year(), dt.month()))
            .or_default()
            .insert(commit.author.as_str());

        let acc = per_author
            .entry(commit.author.as_str())
            .or_insert_with(|| ContributorAcc {
                first_ts: commit.timestamp,
                last_ts: commit.timestamp,
                ..Default::default()
            });
        acc.commits += 1;
        acc.first_ts = acc.first_ts.min(commit.timestamp);
        acc.last_ts = acc.last_ts.max(commit.timestamp);
        acc.days.insert(dt.date_naive());
    }

    // Walk every month between the first and last commit, including months
    // with no commits, so the timeline has no gaps.
    let mut evolution = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    if let (Some(&first), Some(&last)) = (
        monthly.keys().next(),
        monthly.keys().next_back(),
    ) {
        let mut current = first;
        loop {
            let empty = HashSet::new();
            let active = monthly.get(&current).unwrap_or(&empty);
            let new_contributors = active.iter().filter(|a| !seen.contains(*a)).count() as u32;
            seen.extend(active.iter().copied());

            evolution.push(MonthEntry {
                month: format!("{:04}-{:02}", current.0, current.1),
                active_contributors: active.len() as u32,
                new_contributors,
                total_contributors: seen.len() as u32,
            });

            if current == last {
                break;
            }
            current = next_month(current);
        }
    }

    let mut contributor_stats: Vec<ContributorStats> = per_author
        .into_iter()
        .map(|(author, acc)| {
            let active_days = acc.days.len() as u32;
            ContributorStats {
                author: author.to_string(),
                total_commits: acc.commits,
                first_commit: format_date(acc.first_ts),
                last_commit: format_date(acc.last_ts),
                active_days,
                commits_per_day: round3(f64::from(acc.commits) / f64::from(active_days.max(1))),
            }
        })
        .collect();
    contributor_stats.sort_by(|a, b| {
        b.total_commits
            .cmp(&a.total_commits)
            .then(a.author.cmp(&b.author))
    });
    let total_contributors = contributor_stats.len();
    contributor_stats.truncate(top_contributors);

    Analysis {
        total_contributors,
        contributor_evolution: evolution,
        contributor_stats,
    }
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn format_date(timestamp: i64) -> String {
    use chrono::TimeZone;
    chrono::Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .unwrap_or(chrono::DateTime::UNIX_EPOCH)
        .format("%Y-%m-%d")
        .to_string()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Contributor section of the evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// Distinct author names across the whole history.
    pub total_contributors: usize,
    /// Gap-free monthly timeline, oldest first.
    pub contributor_evolution: Vec<MonthEntry>,
    /// Most active contributors, by total commits.
    pub contributor_stats: Vec<ContributorStats>,
}

/// One month of contributor activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthEntry {
    pub month: String,
    /// Distinct authors with at least one commit this month.
    pub active_contributors: u32,
    /// Authors first seen this month.
    pub new_contributors: u32,
    /// Cumulative distinct authors up to and including this month.
    pub total_contributors: u32,
}

/// Lifetime activity of one contributor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorStats {
    pub author: String,
    pub total_commits: u32,
    pub first_commit: String,
    pub last_commit: String,
    /// Distinct calendar days with at least one commit.
    pub active_days: u32,
    pub commits_per_day: f64,
}
