//! Artifact export and the manifest of written files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, info};

use pilotscore_core::report::AnalysisReport;

use crate::chart::{box_plot, frequency_chart, mean_std_chart};
use crate::csv::{frequency_csv, summary_csv, tidy_csv, write_csv};
use crate::html::write_html_report;
use crate::raster::write_png;

pub const TIDY_CSV: &str = "pilot_eval_scores.csv";
pub const SUMMARY_CSV: &str = "pilot_eval_summary.csv";
pub const FREQUENCY_CSV: &str = "pilot_eval_score_frequencies.csv";
pub const MEAN_CHART: &str = "mean_scores_with_std.png";
pub const JSON_REPORT: &str = "pilot_eval_report.json";
pub const HTML_REPORT: &str = "pilot_eval_report.html";

pub fn boxplot_file(metric: &str) -> String {
    format!("boxplot_{metric}.png")
}

pub fn frequency_chart_file(metric: &str) -> String {
    format!("frequencies_{metric}.png")
}

/// Optional outputs on top of the tables and charts, which are always written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFormat {
    Json,
    Html,
}

impl FromStr for ExtraFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExtraFormat::Json),
            "html" => Ok(ExtraFormat::Html),
            other => Err(format!("unknown format: {other}")),
        }
    }
}

/// Parse a `--format` value: `csv` (tables and charts only), `json`, `html`,
/// `all`, or a comma-separated mix.
pub fn parse_formats(list: &str) -> Result<Vec<ExtraFormat>> {
    let mut formats = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part {
            "csv" => {}
            "all" => {
                formats = vec![ExtraFormat::Json, ExtraFormat::Html];
            }
            other => {
                let format: ExtraFormat = other.parse().map_err(|e: String| anyhow::anyhow!(e))?;
                if !formats.contains(&format) {
                    formats.push(format);
                }
            }
        }
    }
    Ok(formats)
}

/// What a written file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    TidyTable,
    SummaryTable,
    MeanChart,
    BoxPlot,
    FrequencyChart,
    FrequencyTable,
    JsonReport,
    HtmlReport,
}

/// A file written by the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub metric: Option<String>,
    pub path: PathBuf,
}

impl Artifact {
    fn new(kind: ArtifactKind, path: PathBuf) -> Self {
        Self {
            kind,
            metric: None,
            path,
        }
    }

    fn for_metric(kind: ArtifactKind, metric: &str, path: PathBuf) -> Self {
        Self {
            kind,
            metric: Some(metric.to_string()),
            path,
        }
    }

    pub fn label(&self) -> String {
        let metric = self.metric.as_deref().unwrap_or("");
        match self.kind {
            ArtifactKind::TidyTable => "Tidy CSV".into(),
            ArtifactKind::SummaryTable => "Summary CSV".into(),
            ArtifactKind::MeanChart => "Mean±Std chart".into(),
            ArtifactKind::BoxPlot => format!("Boxplot ({metric})"),
            ArtifactKind::FrequencyChart => format!("Frequencies ({metric})"),
            ArtifactKind::FrequencyTable => "Frequency CSV".into(),
            ArtifactKind::JsonReport => "JSON report".into(),
            ArtifactKind::HtmlReport => "HTML report".into(),
        }
    }
}

/// Files written by one export, in presentation order.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub artifacts: Vec<Artifact>,
}

impl Manifest {
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|a| a.path.as_path())
    }

    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved files:")?;
        for artifact in &self.artifacts {
            writeln!(f, "- {}: {}", artifact.label(), artifact.path.display())?;
        }
        Ok(())
    }
}

/// Write every artifact for a report into `output_dir`.
///
/// Tables are written unconditionally. Box plots and frequency charts exist
/// only for metrics with data, and only written files enter the manifest.
pub fn export_all(
    report: &AnalysisReport,
    output_dir: &Path,
    extras: &[ExtraFormat],
) -> Result<Manifest> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;

    let mut manifest = Manifest::default();
    let metrics = &report.table.metrics;

    let path = output_dir.join(TIDY_CSV);
    write_csv(&path, &tidy_csv(&report.table))?;
    manifest.artifacts.push(Artifact::new(ArtifactKind::TidyTable, path));

    let path = output_dir.join(SUMMARY_CSV);
    write_csv(&path, &summary_csv(&report.summaries))?;
    manifest.artifacts.push(Artifact::new(ArtifactKind::SummaryTable, path));

    let path = output_dir.join(MEAN_CHART);
    write_png(&path, &mean_std_chart(&report.summaries, &report.scale))?;
    manifest.artifacts.push(Artifact::new(ArtifactKind::MeanChart, path));

    for metric in metrics.iter() {
        let Some(stats) = report.box_stats_for(metric) else {
            debug!("no values for {metric}, skipping box plot");
            continue;
        };
        let path = output_dir.join(boxplot_file(metric));
        write_png(&path, &box_plot(stats, &report.scale))?;
        manifest
            .artifacts
            .push(Artifact::for_metric(ArtifactKind::BoxPlot, metric, path));
    }

    for metric in metrics.iter() {
        let Some(record) = report.frequency(metric) else {
            debug!("no values for {metric}, skipping frequency chart");
            continue;
        };
        let path = output_dir.join(frequency_chart_file(metric));
        write_png(&path, &frequency_chart(record))?;
        manifest
            .artifacts
            .push(Artifact::for_metric(ArtifactKind::FrequencyChart, metric, path));
    }

    let path = output_dir.join(FREQUENCY_CSV);
    write_csv(&path, &frequency_csv(&report.frequencies, &report.scale))?;
    manifest
        .artifacts
        .push(Artifact::new(ArtifactKind::FrequencyTable, path));

    for extra in extras {
        match extra {
            ExtraFormat::Json => {
                let path = output_dir.join(JSON_REPORT);
                report.save_json(&path)?;
                manifest.artifacts.push(Artifact::new(ArtifactKind::JsonReport, path));
            }
            ExtraFormat::Html => {
                let path = output_dir.join(HTML_REPORT);
                write_html_report(report, &path)?;
                manifest.artifacts.push(Artifact::new(ArtifactKind::HtmlReport, path));
            }
        }
    }

    info!(
        "wrote {} artifact(s) to {}",
        manifest.artifacts.len(),
        output_dir.display()
    );

    Ok(manifest)
}
