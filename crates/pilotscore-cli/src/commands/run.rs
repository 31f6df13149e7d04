//! The `pilotscore run` command.

use std::path::PathBuf;

use anyhow::Result;

use pilotscore_core::pipeline::run_pipeline;
use pilotscore_core::report::AnalysisReport;
use pilotscore_report::export::{export_all, parse_formats};

pub fn execute(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    metrics: Option<String>,
    rounding: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let extras = parse_formats(&format)?;
    let config = super::resolve_config(config_path, input, output, metrics, rounding)?;
    tracing::debug!(?config, "resolved configuration");

    eprintln!(
        "pilotscore v{} — {} ({} metrics, {} rounding)",
        env!("CARGO_PKG_VERSION"),
        config.input.display(),
        config.metrics.len(),
        config.rounding
    );

    // Nothing is written until the whole analysis has succeeded.
    let report = run_pipeline(&config)?;

    print_summary(&report);

    let manifest = export_all(&report, &config.output_dir, &extras)?;
    print!("{manifest}");

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    use comfy_table::{Cell, Table};

    let fmt = |v: Option<f64>| v.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".into());

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Mean", "Std", "Min", "Max", "Count"]);

    for s in &report.summaries {
        table.add_row(vec![
            Cell::new(&s.metric),
            Cell::new(fmt(s.mean)),
            Cell::new(fmt(s.std)),
            Cell::new(fmt(s.min)),
            Cell::new(fmt(s.max)),
            Cell::new(s.count),
        ]);
    }

    eprintln!(
        "\n{} row(s) from {} record(s); {} malformed line(s) skipped, {} row(s) without scores dropped",
        report.load.rows, report.load.records, report.load.skipped_lines, report.load.dropped_rows
    );
    eprintln!("{table}\n");
}
