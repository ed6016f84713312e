//! Configuration loading and management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sampling densities for the expensive passes.
    pub sampling: SamplingConfig,
    /// Ranking and list sizes in the report.
    pub report: ReportConfig,
    /// Classifier tuning.
    pub classify: ClassifyConfig,
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config`
    /// flags.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from a directory, looking for `lineage.toml` or
    /// `.lineage/lineage.toml`. Missing files fall back to defaults.
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        for candidate in [dir.join("lineage.toml"), dir.join(".lineage/lineage.toml")] {
            if candidate.exists() {
                return Self::from_file(candidate);
            }
        }
        Ok(Self::default())
    }
}

/// Sampling densities; bound the cost of the expensive passes on long
/// histories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Target commit count for the complexity trend.
    pub complexity: usize,
    /// Target commit count for the churn pass.
    pub churn: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            complexity: 30,
            churn: 100,
        }
    }
}

/// Ranking sizes in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Top-N authors in the bug-fixer ranking.
    pub top_fixers: usize,
    /// Top-N files in the fix-prone ranking.
    pub top_buggy_files: usize,
    /// Top-N files in the high-churn ranking.
    pub top_churn_files: usize,
    /// Most recent fixes listed verbatim.
    pub recent_fixes: usize,
    /// Top-N contributors in the per-contributor stats.
    pub top_contributors: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_fixers: 10,
            top_buggy_files: 10,
            top_churn_files: 20,
            recent_fixes: 20,
            top_contributors: 20,
        }
    }
}

/// Classifier tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Keywords checked in addition to the built-in table.
    pub extra_keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sampling.complexity, 30);
        assert_eq!(config.sampling.churn, 100);
        assert_eq!(config.report.top_fixers, 10);
        assert!(config.classify.extra_keywords.is_empty());
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/lineage.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_default_empty_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_default(temp.path()).unwrap();
        assert_eq!(config.sampling.churn, 100);
    }

    #[test]
    fn test_partial_file_overrides() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("lineage.toml");
        std::fs::write(
            &path,
            "[sampling]\ncomplexity = 5\n\n[classify]\nextra_keywords = [\"oops\"]\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.sampling.complexity, 5);
        // Unset fields keep their defaults.
        assert_eq!(config.sampling.churn, 100);
        assert_eq!(config.classify.extra_keywords, ["oops"]);
    }

    #[test]
    fn test_invalid_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("lineage.toml");
        std::fs::write(&path, "sampling = \"not a table\"").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
