//! Pipeline orchestration.
//!
//! Runs the stages in order: load → extract → clean → summarize and count.
//! Everything after loading is a pure function of the records, so tests can
//! drive [`analyze_records`] without touching the filesystem.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::clean::clean_rows;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::extract::extract_rows;
use crate::frequency::frequencies;
use crate::loader::{load_records, LoadedRecords};
use crate::model::{MetricSet, RoundingMode, ScoreScale};
use crate::report::{AnalysisReport, LoadStats};
use crate::statistics::{box_stats_for, summarize};

/// Settings that shape the analysis itself (as opposed to where files live).
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub metrics: MetricSet,
    pub rounding: RoundingMode,
    pub scale: ScoreScale,
}

impl From<&PipelineConfig> for AnalysisOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            metrics: config.metrics.clone(),
            rounding: config.rounding,
            scale: config.scale,
        }
    }
}

/// Analyze already-loaded records.
pub fn analyze_records(
    loaded: LoadedRecords,
    source: Option<&Path>,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, PipelineError> {
    options.scale.validate()?;
    let start = Instant::now();

    let record_count = loaded.records.len();
    let extracted = extract_rows(&loaded.records, &options.metrics);
    let cleaned = clean_rows(extracted, &options.metrics)?;
    let table = cleaned.table;

    let summaries = summarize(&table);
    let box_stats = box_stats_for(&table);
    let frequencies = frequencies(&table, options.rounding, &options.scale);

    let load = LoadStats {
        records: record_count,
        skipped_lines: loaded.skipped_lines,
        dropped_rows: cleaned.dropped_rows,
        rows: table.len(),
    };

    Ok(AnalysisReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        source: source.map(Path::to_path_buf),
        rounding: options.rounding,
        scale: options.scale,
        load,
        table,
        summaries,
        box_stats,
        frequencies,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Load the configured source and analyze it.
pub fn run_pipeline(config: &PipelineConfig) -> Result<AnalysisReport, PipelineError> {
    config.validate()?;
    let loaded = load_records(&config.input)?;
    let report = analyze_records(loaded, Some(&config.input), &AnalysisOptions::from(config))?;

    info!(
        "analyzed {} row(s) across {} metric(s) from {}",
        report.load.rows,
        report.table.metrics.len(),
        config.input.display()
    );

    Ok(report)
}
