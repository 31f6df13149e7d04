//! The `pilotscore` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "pilotscore",
    version,
    about = "Summarize pilot evaluation scores into tables and charts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, clean, summarize, and export tables and charts
    Run {
        /// JSONL file with one evaluation record per line
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Metrics to extract (comma-separated, default: accuracy,explainability,consistency,safety)
        #[arg(long)]
        metrics: Option<String>,

        /// Tie rounding for frequency buckets: half-even, half-away-from-zero
        #[arg(long)]
        rounding: Option<String>,

        /// Extra outputs: csv, json, html, all
        #[arg(long, default_value = "csv")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check an input file without writing anything
    Validate {
        /// JSONL file to check
        #[arg(long)]
        input: Option<PathBuf>,

        /// Metrics to extract (comma-separated)
        #[arg(long)]
        metrics: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two JSON analysis reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Minimum change in a metric mean to count as a regression or improvement
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create a starter pilotscore.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pilotscore=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            metrics,
            rounding,
            format,
            config,
        } => commands::run::execute(input, output, metrics, rounding, format, config),
        Commands::Validate {
            input,
            metrics,
            config,
        } => commands::validate::execute(input, metrics, config),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
