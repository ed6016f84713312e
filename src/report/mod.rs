//! Report assembly.
//!
//! Drives the analyzers in a fixed order and merges their outputs into one
//! immutable [`EvolutionReport`]. A failing analyzer is logged, recorded as
//! a warning, and its section omitted; sibling analyzers always run. The
//! metadata block is present even under partial failure.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analyzers::{bugfix, churn, contributors, velocity};
#[cfg(feature = "complexity")]
use crate::analyzers::complexity;
use crate::config::Config;
use crate::core::{AnalysisContext, Analyzer, Result};
use crate::git::GitRepo;

/// Report metadata; always present, even when sections are missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Path the repository was opened at.
    pub repository: String,
    /// When the analysis ran, `YYYY-MM-DD HH:MM:SS` UTC.
    pub analysis_date: String,
    /// Commit count of the full history.
    pub total_commits: usize,
    /// Tool name and version that produced the report.
    pub generator: String,
    /// One entry per omitted or degraded section.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// The assembled evolution report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug_fix_analysis: Option<bugfix::Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_churn: Option<churn::Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_velocity: Option<velocity::Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor_evolution: Option<contributors::Analysis>,
    #[cfg(feature = "complexity")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_evolution: Option<complexity::Analysis>,
}

/// Assemble the full report for a repository.
pub fn assemble(repo: &GitRepo, config: &Config) -> Result<EvolutionReport> {
    let commits = repo.commits_chronological()?;
    let ctx = AnalysisContext::new(repo, &commits, config);
    Ok(assemble_with_context(&ctx))
}

/// Assemble the full report with a progress callback for the long passes.
pub fn assemble_with_progress<F>(
    repo: &GitRepo,
    config: &Config,
    on_progress: F,
) -> Result<EvolutionReport>
where
    F: Fn(usize, usize) + Send + Sync,
{
    let commits = repo.commits_chronological()?;
    let ctx = AnalysisContext::new(repo, &commits, config).with_progress(on_progress);
    Ok(assemble_with_context(&ctx))
}

fn assemble_with_context(ctx: &AnalysisContext<'_>) -> EvolutionReport {
    let mut warnings = Vec::new();

    let bug_fix_analysis = run_section(&bugfix::Analyzer::new(), ctx, &mut warnings);
    let code_churn = run_section(&churn::Analyzer::new(), ctx, &mut warnings);
    let development_velocity = run_section(&velocity::Analyzer::new(), ctx, &mut warnings);
    let contributor_evolution = run_section(&contributors::Analyzer::new(), ctx, &mut warnings);

    #[cfg(feature = "complexity")]
    let complexity_evolution = run_section(&complexity::Analyzer::new(), ctx, &mut warnings);
    #[cfg(not(feature = "complexity"))]
    warnings.push(
        "complexity: section skipped, built without the `complexity` feature".to_string(),
    );

    EvolutionReport {
        metadata: Metadata {
            repository: ctx.repo.path().display().to_string(),
            analysis_date: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            total_commits: ctx.commits.len(),
            generator: concat!("lineage ", env!("CARGO_PKG_VERSION")).to_string(),
            warnings,
        },
        bug_fix_analysis,
        code_churn,
        development_velocity,
        contributor_evolution,
        #[cfg(feature = "complexity")]
        complexity_evolution,
    }
}

/// Run one analyzer, converting failure into an omitted section.
fn run_section<A: Analyzer>(
    analyzer: &A,
    ctx: &AnalysisContext<'_>,
    warnings: &mut Vec<String>,
) -> Option<A::Output> {
    match analyzer.analyze(ctx) {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::warn!(analyzer = analyzer.name(), error = %e, "section omitted");
            warnings.push(format!("{}: {e}", analyzer.name()));
            None
        }
    }
}
