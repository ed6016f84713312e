//! Output formatting for analysis results.

use std::io::Write;

use serde::Serialize;

use crate::core::Result;
use crate::report::EvolutionReport;

/// Output format for the assembled report.
#[derive(Clone, Copy, Debug, Default)]
pub enum Format {
    #[default]
    Json,
    Text,
}

impl Format {
    /// Write the report in this format.
    pub fn write_report<W: Write>(&self, report: &EvolutionReport, writer: &mut W) -> Result<()> {
        match self {
            Format::Json => write_json(report, writer),
            Format::Text => write_text(report, writer),
        }
    }
}

/// Pretty-printed JSON for any serializable section.
pub fn write_json<T: Serialize, W: Write>(data: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, data)?;
    writeln!(writer)?;
    Ok(())
}

/// Plain-text report summary.
fn write_text<W: Write>(report: &EvolutionReport, writer: &mut W) -> Result<()> {
    let meta = &report.metadata;
    writeln!(writer, "Repository evolution report")?;
    writeln!(writer, "{}", "=".repeat(50))?;
    writeln!(writer)?;
    writeln!(writer, "Repository:    {}", meta.repository)?;
    writeln!(writer, "Analyzed at:   {}", meta.analysis_date)?;
    writeln!(writer, "Total commits: {}", meta.total_commits)?;
    for warning in &meta.warnings {
        writeln!(writer, "Warning:       {warning}")?;
    }

    if let Some(bugfix) = &report.bug_fix_analysis {
        writeln!(writer)?;
        writeln!(writer, "1. Bug fixes")?;
        writeln!(writer, "{}", "-".repeat(30))?;
        writeln!(
            writer,
            "{} fix commits ({:.1}% of history)",
            bugfix.total_bug_fixes, bugfix.fix_rate
        )?;
        for (i, fixer) in bugfix.top_bug_fixers.iter().enumerate() {
            writeln!(writer, "{:2}. {} ({} fixes)", i + 1, fixer.author, fixer.fixes)?;
        }
        if !bugfix.most_buggy_files.is_empty() {
            writeln!(writer, "Most fix-prone files:")?;
            for file in bugfix.most_buggy_files.iter().take(5) {
                writeln!(writer, "    {} ({} fixes)", file.file, file.bug_fixes)?;
            }
        }
    }

    if let Some(churn) = &report.code_churn {
        writeln!(writer)?;
        writeln!(writer, "2. Code churn")?;
        writeln!(writer, "{}", "-".repeat(30))?;
        writeln!(
            writer,
            "+{} / -{} lines over {} commits{}",
            churn.total_additions,
            churn.total_deletions,
            churn.analyzed_commits,
            if churn.sampled { " (sampled)" } else { "" }
        )?;
        for file in churn.high_churn_files.iter().take(5) {
            writeln!(
                writer,
                "    {} (churn {}, {} changes)",
                file.file, file.total_churn, file.change_count
            )?;
        }
    }

    if let Some(velocity) = &report.development_velocity {
        writeln!(writer)?;
        writeln!(writer, "3. Velocity")?;
        writeln!(writer, "{}", "-".repeat(30))?;
        for month in velocity.monthly_velocity.iter().rev().take(6).rev() {
            writeln!(
                writer,
                "    {}: {} commits, {} authors",
                month.month, month.commits, month.active_authors
            )?;
        }
    }

    if let Some(contributors) = &report.contributor_evolution {
        writeln!(writer)?;
        writeln!(writer, "4. Contributors")?;
        writeln!(writer, "{}", "-".repeat(30))?;
        writeln!(writer, "{} distinct contributors", contributors.total_contributors)?;
        for month in contributors.contributor_evolution.iter().rev().take(6).rev() {
            writeln!(
                writer,
                "    {}: {} active, {} new, {} cumulative",
                month.month,
                month.active_contributors,
                month.new_contributors,
                month.total_contributors
            )?;
        }
    }

    #[cfg(feature = "complexity")]
    if let Some(complexity) = &report.complexity_evolution {
        writeln!(writer)?;
        writeln!(writer, "5. Complexity trend")?;
        writeln!(writer, "{}", "-".repeat(30))?;
        writeln!(
            writer,
            "{} trend points over {} sampled commits",
            complexity.points.len(),
            complexity.analyzed_commits
        )?;
        if let (Some(first), Some(last)) = (complexity.points.first(), complexity.points.last()) {
            writeln!(
                writer,
                "    {}: {:.2} avg -> {}: {:.2} avg",
                first.date, first.avg_complexity, last.date, last.avg_complexity
            )?;
        }
    }

    Ok(())
}
