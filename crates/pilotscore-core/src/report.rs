//! Analysis report types with JSON persistence and run-to-run comparison.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    BoxStats, FrequencyRecord, RoundingMode, ScoreScale, ScoreTable, SummaryRecord,
};

/// The complete result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the analysis was produced.
    pub created_at: DateTime<Utc>,
    /// Source file, if the records came from disk.
    #[serde(default)]
    pub source: Option<PathBuf>,
    /// Tie-breaking rule used for frequency buckets.
    pub rounding: RoundingMode,
    /// Bucket range used for frequency tallies.
    pub scale: ScoreScale,
    /// What happened while loading and cleaning.
    pub load: LoadStats,
    /// Cleaned rows.
    pub table: ScoreTable,
    /// One summary per metric, in metric order.
    pub summaries: Vec<SummaryRecord>,
    /// Box-plot numbers for metrics with data.
    pub box_stats: Vec<BoxStats>,
    /// Frequency tallies for metrics with data.
    pub frequencies: Vec<FrequencyRecord>,
    /// Wall-clock analysis time in milliseconds.
    pub duration_ms: u64,
}

/// Counters from the load and clean stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Records parsed from the source.
    pub records: usize,
    /// Non-empty lines that were not JSON objects.
    pub skipped_lines: usize,
    /// Records dropped because every score was missing.
    pub dropped_rows: usize,
    /// Rows that survived cleaning.
    pub rows: usize,
}

impl AnalysisReport {
    pub fn summary(&self, metric: &str) -> Option<&SummaryRecord> {
        self.summaries.iter().find(|s| s.metric == metric)
    }

    pub fn box_stats_for(&self, metric: &str) -> Option<&BoxStats> {
        self.box_stats.iter().find(|b| b.metric == metric)
    }

    pub fn frequency(&self, metric: &str) -> Option<&FrequencyRecord> {
        self.frequencies.iter().find(|f| f.metric == metric)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AnalysisReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare per-metric means against a baseline run.
    pub fn compare(&self, baseline: &AnalysisReport, threshold: f64) -> ComparisonReport {
        let means = |report: &AnalysisReport| -> HashMap<String, Option<f64>> {
            report
                .summaries
                .iter()
                .map(|s| (s.metric.clone(), s.mean))
                .collect()
        };
        let baseline_means = means(baseline);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut added_metrics = Vec::new();

        // Walk the current report in order so output follows metric order.
        for summary in &self.summaries {
            let Some(&baseline_mean) = baseline_means.get(&summary.metric) else {
                added_metrics.push(summary.metric.clone());
                continue;
            };
            let (Some(base), Some(current)) = (baseline_mean, summary.mean) else {
                unchanged += 1;
                continue;
            };
            let change = MeanChange {
                metric: summary.metric.clone(),
                baseline_mean: base,
                current_mean: current,
                delta: current - base,
            };
            if change.delta < -threshold {
                regressions.push(change);
            } else if change.delta > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_metrics = baseline
            .summaries
            .iter()
            .filter(|s| self.summary(&s.metric).is_none())
            .map(|s| s.metric.clone())
            .collect();

        ComparisonReport {
            regressions,
            improvements,
            unchanged,
            added_metrics,
            removed_metrics,
        }
    }
}

/// Result of comparing two analysis reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Metrics whose mean dropped by more than the threshold.
    pub regressions: Vec<MeanChange>,
    /// Metrics whose mean rose by more than the threshold.
    pub improvements: Vec<MeanChange>,
    /// Metrics with no significant change (or no mean on one side).
    pub unchanged: usize,
    /// Metrics only in the current report.
    pub added_metrics: Vec<String>,
    /// Metrics only in the baseline report.
    pub removed_metrics: Vec<String>,
}

/// A change in one metric's mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanChange {
    pub metric: String,
    pub baseline_mean: f64,
    pub current_mean: f64,
    pub delta: f64,
}

impl ComparisonReport {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Metric | Baseline | Current | Delta |\n");
            md.push_str("|--------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:+.2} |\n",
                    c.metric, c.baseline_mean, c.current_mean, c.delta
                ));
            }
            md.push('\n');
        }

        if !self.added_metrics.is_empty() {
            md.push_str(&format!("New metrics: {}\n", self.added_metrics.join(", ")));
        }
        if !self.removed_metrics.is_empty() {
            md.push_str(&format!(
                "Removed metrics: {}\n",
                self.removed_metrics.join(", ")
            ));
        }

        md
    }
}
