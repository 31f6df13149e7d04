pub mod compare;
pub mod init;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use pilotscore_core::config::{load_config_from, PipelineConfig};
use pilotscore_core::model::{MetricSet, RoundingMode};

/// Load the config file and layer command-line overrides on top.
pub fn resolve_config(
    config_path: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    metrics: Option<String>,
    rounding: Option<String>,
) -> Result<PipelineConfig> {
    let mut config = load_config_from(config_path.as_deref())?;

    if let Some(input) = input {
        config.input = input;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(metrics) = metrics {
        config.metrics = MetricSet::parse_list(&metrics)?;
    }
    if let Some(rounding) = rounding {
        config.rounding = rounding
            .parse::<RoundingMode>()
            .map_err(|e| anyhow::anyhow!("{}", e))?;
    }

    config.validate()?;
    Ok(config)
}
