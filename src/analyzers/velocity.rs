//! Development velocity analysis.
//!
//! Buckets commit counts and authorship by ISO week and by month. Both
//! granularities are exposed: weekly buckets reveal burst patterns that
//! monthly buckets smooth over.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{AnalysisContext, Analyzer as AnalyzerTrait, Result};
use crate::git::Commit;

/// Velocity analyzer.
#[derive(Default)]
pub struct Analyzer;

impl Analyzer {
    /// Create a new velocity analyzer.
    pub fn new() -> Self {
        Self
    }
}

impl AnalyzerTrait for Analyzer {
    type Output = Analysis;

    fn name(&self) -> &'static str {
        "velocity"
    }

    fn description(&self) -> &'static str {
        "Bucket commit pace by ISO week and month"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output> {
        let analysis = build_analysis(ctx.commits);
        tracing::info!(
            weeks = analysis.weekly_velocity.len(),
            months = analysis.monthly_velocity.len(),
            "velocity analysis complete"
        );
        Ok(analysis)
    }
}

#[derive(Default)]
struct Bucket<'a> {
    commits: u32,
    authors: BTreeSet<&'a str>,
    days: BTreeSet<NaiveDate>,
}

/// Bucket the full history by week and month.
fn build_analysis(commits: &[Commit]) -> Analysis {
    let mut weekly: BTreeMap<String, Bucket<'_>> = BTreeMap::new();
    let mut monthly: BTreeMap<String, Bucket<'_>> = BTreeMap::new();

    for commit in commits {
        let day = commit.datetime().date_naive();

        let week = weekly.entry(commit.week_key()).or_default();
        week.commits += 1;
        week.authors.insert(commit.author.as_str());

        let month = monthly.entry(commit.month_key()).or_default();
        month.commits += 1;
        month.authors.insert(commit.author.as_str());
        month.days.insert(day);
    }

    let weekly_velocity = weekly
        .into_iter()
        .map(|(week, bucket)| WeekStats {
            week,
            commits: bucket.commits,
            active_authors: bucket.authors.len() as u32,
            avg_commits_per_author: round2(f64::from(bucket.commits) / bucket.authors.len() as f64),
        })
        .collect();

    let monthly_velocity = monthly
        .into_iter()
        .map(|(month, bucket)| MonthStats {
            month,
            commits: bucket.commits,
            active_authors: bucket.authors.len() as u32,
            active_days: bucket.days.len() as u32,
            commits_per_day: round2(f64::from(bucket.commits) / bucket.days.len() as f64),
        })
        .collect();

    Analysis {
        weekly_velocity,
        monthly_velocity,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Velocity section of the evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub weekly_velocity: Vec<WeekStats>,
    pub monthly_velocity: Vec<MonthStats>,
}

/// Commit pace for one ISO week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekStats {
    pub week: String,
    pub commits: u32,
    pub active_authors: u32,
    pub avg_commits_per_author: f64,
}

/// Commit pace for one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthStats {
    pub month: String,
    pub commits: u32,
    pub active_authors: u32,
    pub active_days: u32,
    pub commits_per_day: f64,
}
