//! The `pilotscore validate` command.

use std::path::PathBuf;

use anyhow::Result;

use pilotscore_core::loader::load_records;
use pilotscore_core::pipeline::{analyze_records, AnalysisOptions};

pub fn execute(
    input: Option<PathBuf>,
    metrics: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::resolve_config(config_path, input, None, metrics, None)?;

    let loaded = load_records(&config.input)?;
    let report = analyze_records(loaded, Some(&config.input), &AnalysisOptions::from(&config))?;

    println!("Input: {}", config.input.display());
    println!(
        "Records: {} parsed, {} malformed line(s) skipped",
        report.load.records, report.load.skipped_lines
    );
    println!(
        "Rows: {} with scores, {} dropped without any score",
        report.load.rows, report.load.dropped_rows
    );

    let mut empty = 0;
    for s in &report.summaries {
        if s.count == 0 {
            empty += 1;
            println!("  [{}] WARNING: no values", s.metric);
        } else {
            println!("  [{}] {}/{} rows", s.metric, s.count, report.load.rows);
        }
    }

    if empty == 0 && report.load.skipped_lines == 0 {
        println!("Input valid.");
    } else {
        println!("\nInput usable with warnings.");
    }

    Ok(())
}
