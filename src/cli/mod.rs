//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Lineage - mine a git repository for evolutionary trends.
#[derive(Parser)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the repository to analyze
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Output format for the assembled report
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assemble the full evolution report
    Report(ReportArgs),

    /// Bug-fix pattern analysis only
    #[command(alias = "fixes")]
    Bugfix,

    /// Code churn analysis only
    Churn(SampleArgs),

    /// Development velocity analysis only
    Velocity,

    /// Contributor evolution analysis only
    #[command(alias = "authors")]
    Contributors,

    /// Complexity evolution trend only
    #[cfg(feature = "complexity")]
    #[command(alias = "cx")]
    Complexity(SampleArgs),
}

#[derive(Args)]
pub struct ReportArgs {
    /// Directory to write analysis_result.json and report.txt into
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Top-N size for author and file rankings
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Sampling density for the churn and complexity passes
    #[arg(short, long)]
    pub sample: Option<usize>,
}

#[derive(Args)]
pub struct SampleArgs {
    /// Sampling density for this pass
    #[arg(short, long)]
    pub sample: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Json,
    Text,
}
