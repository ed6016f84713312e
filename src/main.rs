//! Lineage CLI - mine a git repository for evolutionary trends.

use std::fs::File;
use std::io::stdout;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::ProgressBar;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lineage::cli::{Cli, Command, OutputFormat, ReportArgs};
use lineage::config::Config;
use lineage::core::{AnalysisContext, Analyzer};
use lineage::git::GitRepo;
use lineage::output::{self, Format};
use lineage::report::{self, EvolutionReport};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_default(&cli.path)?,
    };

    let repo = GitRepo::open(&cli.path)?;

    match cli.command {
        Command::Report(args) => run_report(&repo, config, &args, cli.format)?,
        Command::Bugfix => {
            run_analyzer(&lineage::analyzers::bugfix::Analyzer::new(), &repo, &config)?;
        }
        Command::Churn(args) => {
            if let Some(n) = args.sample {
                config.sampling.churn = n;
            }
            run_analyzer(&lineage::analyzers::churn::Analyzer::new(), &repo, &config)?;
        }
        Command::Velocity => {
            run_analyzer(&lineage::analyzers::velocity::Analyzer::new(), &repo, &config)?;
        }
        Command::Contributors => {
            run_analyzer(
                &lineage::analyzers::contributors::Analyzer::new(),
                &repo,
                &config,
            )?;
        }
        #[cfg(feature = "complexity")]
        Command::Complexity(args) => {
            if let Some(n) = args.sample {
                config.sampling.complexity = n;
            }
            run_analyzer(
                &lineage::analyzers::complexity::Analyzer::new(),
                &repo,
                &config,
            )?;
        }
    }

    Ok(())
}

fn run_analyzer<A: Analyzer>(analyzer: &A, repo: &GitRepo, config: &Config) -> anyhow::Result<()> {
    let commits = repo.commits_chronological()?;
    let ctx = AnalysisContext::new(repo, &commits, config);
    let result = analyzer
        .analyze(&ctx)
        .with_context(|| format!("{} analysis failed", analyzer.name()))?;
    output::write_json(&result, &mut stdout())?;
    Ok(())
}

fn run_report(
    repo: &GitRepo,
    mut config: Config,
    args: &ReportArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if let Some(top) = args.top {
        config.report.top_fixers = top;
        config.report.top_buggy_files = top;
        config.report.top_contributors = top;
    }
    if let Some(sample) = args.sample {
        config.sampling.complexity = sample;
        config.sampling.churn = sample;
    }

    let bar = ProgressBar::new(0);
    let report = report::assemble_with_progress(repo, &config, |current, total| {
        bar.set_length(total as u64);
        bar.set_position(current as u64);
    })?;
    bar.finish_and_clear();

    match &args.output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory {}", dir.display()))?;
            write_report_files(&report, dir)?;
            print_digest(&report);
            println!("\n{} {}", "Results written to".bold(), dir.display());
        }
        None => {
            let format = match format {
                OutputFormat::Json => Format::Json,
                OutputFormat::Text => Format::Text,
            };
            format.write_report(&report, &mut stdout())?;
        }
    }

    Ok(())
}

fn write_report_files(report: &EvolutionReport, dir: &Path) -> anyhow::Result<()> {
    let json_path = dir.join("analysis_result.json");
    let mut json_file = File::create(&json_path)
        .with_context(|| format!("creating {}", json_path.display()))?;
    output::write_json(report, &mut json_file)?;

    let text_path = dir.join("report.txt");
    let mut text_file = File::create(&text_path)
        .with_context(|| format!("creating {}", text_path.display()))?;
    Format::Text.write_report(report, &mut text_file)?;

    Ok(())
}

fn print_digest(report: &EvolutionReport) {
    let meta = &report.metadata;
    println!("{}", "Analysis complete".bold().green());
    println!("  {} {}", "Repository:".bold(), meta.repository);
    println!("  {} {}", "Commits:".bold(), meta.total_commits);

    if let Some(bugfix) = &report.bug_fix_analysis {
        println!(
            "  {} {} ({:.1}%)",
            "Bug fixes:".bold(),
            bugfix.total_bug_fixes,
            bugfix.fix_rate
        );
        if let Some(top) = bugfix.top_bug_fixers.first() {
            println!("  {} {} ({} fixes)", "Top fixer:".bold(), top.author, top.fixes);
        }
    }
    if let Some(churn) = &report.code_churn {
        println!(
            "  {} +{} / -{} lines{}",
            "Churn:".bold(),
            churn.total_additions,
            churn.total_deletions,
            if churn.sampled { " (sampled)" } else { "" }
        );
    }
    if let Some(contributors) = &report.contributor_evolution {
        println!(
            "  {} {}",
            "Contributors:".bold(),
            contributors.total_contributors
        );
    }
    for warning in &meta.warnings {
        println!("  {} {}", "Warning:".bold().yellow(), warning);
    }
}
