//! Pipeline configuration and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::model::{MetricSet, RoundingMode, ScoreScale};

/// Top-level pilotscore configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// JSONL source file.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Directory that receives tables and charts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Metrics to extract, in output order.
    #[serde(default)]
    pub metrics: MetricSet,
    /// Tie-breaking rule used when bucketing scores.
    #[serde(default)]
    pub rounding: RoundingMode,
    /// Bucket range for frequency tallies and chart axes.
    #[serde(default)]
    pub scale: ScoreScale,
}

fn default_input() -> PathBuf {
    PathBuf::from("./pilot_eval_results.jsonl")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./pilotscore-results")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            metrics: MetricSet::default(),
            rounding: RoundingMode::default(),
            scale: ScoreScale::default(),
        }
    }
}

impl PipelineConfig {
    /// Check the settings that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.scale.validate()?;
        if self.metrics.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one metric is required".into(),
            ));
        }
        Ok(())
    }

    /// Parse a TOML document into a config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(content).context("failed to parse pilotscore config")?;
        Ok(config)
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order when no path is given:
/// 1. `pilotscore.toml` in the current directory
/// 2. `~/.config/pilotscore/config.toml`
///
/// Environment variable overrides: `PILOTSCORE_INPUT`, `PILOTSCORE_OUTPUT_DIR`.
pub fn load_config_from(path: Option<&Path>) -> Result<PipelineConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("pilotscore.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            PipelineConfig::from_toml_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}

fn apply_env_overrides(config: &mut PipelineConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(input) = lookup("PILOTSCORE_INPUT").filter(|v| !v.is_empty()) {
        config.input = PathBuf::from(input);
    }
    if let Some(dir) = lookup("PILOTSCORE_OUTPUT_DIR").filter(|v| !v.is_empty()) {
        config.output_dir = PathBuf::from(dir);
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("pilotscore"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.metrics.len(), 4);
        assert_eq!(config.rounding, RoundingMode::HalfEven);
        assert_eq!(config.scale, ScoreScale { low: 1, high: 5 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
input = "data/results.jsonl"
output_dir = "out"
metrics = ["accuracy", "safety"]
rounding = "half-away-from-zero"

[scale]
low = 0
high = 10
"#;
        let config = PipelineConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.input, PathBuf::from("data/results.jsonl"));
        assert_eq!(config.metrics.names(), &["accuracy", "safety"]);
        assert_eq!(config.rounding, RoundingMode::HalfAwayFromZero);
        assert_eq!(config.scale.high, 10);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = PipelineConfig::from_toml_str("output_dir = \"elsewhere\"").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(config.input, default_input());
        assert_eq!(config.metrics, MetricSet::default());
    }

    #[test]
    fn duplicate_metrics_rejected_at_parse() {
        assert!(PipelineConfig::from_toml_str("metrics = [\"a\", \"a\"]").is_err());
    }

    #[test]
    fn inverted_scale_fails_validation() {
        let config =
            PipelineConfig::from_toml_str("[scale]\nlow = 5\nhigh = 1").unwrap();
        assert!(config.validate().is_err());
        let config =
            PipelineConfig::from_toml_str("[scale]\nlow = 0\nhigh = 10000000000").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_replace_paths() {
        let mut config = PipelineConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "PILOTSCORE_INPUT" => Some("/data/in.jsonl".into()),
            "PILOTSCORE_OUTPUT_DIR" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.input, PathBuf::from("/data/in.jsonl"));
        assert_eq!(config.output_dir, default_output_dir());
    }

    #[test]
    fn explicit_missing_config_path_errors() {
        let err = load_config_from(Some(Path::new("/nonexistent/pilotscore.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_path_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "metrics = [\"fluency\"]\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.metrics.names(), &["fluency"]);
    }
}
