//! Lineage - git history mining for evolutionary trends.
//!
//! Lineage walks a repository's commit history and surfaces how the project
//! evolves: defect-fix hotspots, code churn, development cadence,
//! contributor growth, and (optionally) a complexity trend over sampled
//! revisions.
//!
//! # Example
//!
//! ```no_run
//! use lineage::config::Config;
//! use lineage::git::GitRepo;
//! use lineage::report;
//!
//! let repo = GitRepo::open(".").unwrap();
//! let config = Config::default();
//! let report = report::assemble(&repo, &config).unwrap();
//! println!("{} commits analyzed", report.metadata.total_commits);
//! ```

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod core;
pub mod git;
pub mod output;
#[cfg(feature = "complexity")]
pub mod parser;
pub mod report;
pub mod sample;

pub use core::{AnalysisContext, Analyzer, Error, Result};
