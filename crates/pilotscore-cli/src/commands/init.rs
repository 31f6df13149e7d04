//! The `pilotscore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("pilotscore.toml");
    if path.exists() {
        println!("pilotscore.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG)?;
        println!("Created pilotscore.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point `input` in pilotscore.toml at your JSONL results");
    println!("  2. Run: pilotscore validate");
    println!("  3. Run: pilotscore run --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# pilotscore configuration

input = "./pilot_eval_results.jsonl"
output_dir = "./pilotscore-results"
metrics = ["accuracy", "explainability", "consistency", "safety"]

# half-even (2.5 -> 2) or half-away-from-zero (2.5 -> 3)
rounding = "half-even"

[scale]
low = 1
high = 5
"#;
