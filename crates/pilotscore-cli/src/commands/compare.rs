//! The `pilotscore compare` command.

use std::path::PathBuf;

use anyhow::Result;

use pilotscore_core::report::AnalysisReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = AnalysisReport::load_json(&baseline_path)?;
    let current = AnalysisReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  {} {:.2} -> {:.2} ({:+.2})",
                        r.metric, r.baseline_mean, r.current_mean, r.delta
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  {} {:.2} -> {:.2} ({:+.2})",
                        i.metric, i.baseline_mean, i.current_mean, i.delta
                    );
                }
            }

            if !report.added_metrics.is_empty() {
                println!("\nNew metric(s): {}", report.added_metrics.join(", "));
            }
            if !report.removed_metrics.is_empty() {
                println!("Removed metric(s): {}", report.removed_metrics.join(", "));
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
