//! End-to-end scenarios: a JSONL file in, tables and charts out.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const METRICS: [&str; 4] = ["accuracy", "explainability", "consistency", "safety"];

fn pilotscore(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pilotscore").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("PILOTSCORE_INPUT")
        .env_remove("PILOTSCORE_OUTPUT_DIR");
    cmd
}

fn record(id: &str, scores: &[(&str, &str)]) -> String {
    let eval: Vec<String> = scores
        .iter()
        .map(|(metric, score)| format!("\"{metric}\": {{\"score\": {score}}}"))
        .collect();
    format!("{{\"id\": \"{id}\", \"eval\": {{{}}}}}", eval.join(", "))
}

struct Run {
    _dir: TempDir,
    out: PathBuf,
}

impl Run {
    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.out.join(name)).unwrap()
    }

    fn exists(&self, name: &str) -> bool {
        self.out.join(name).exists()
    }

    fn is_png(&self, name: &str) -> bool {
        std::fs::read(self.out.join(name))
            .map(|bytes| bytes.starts_with(b"\x89PNG\r\n\x1a\n"))
            .unwrap_or(false)
    }

    /// Parse a CSV without quoted fields into header + rows.
    fn table(&self, name: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let content = self.read(name);
        let mut lines = content.lines();
        let header = lines
            .next()
            .unwrap()
            .split(',')
            .map(String::from)
            .collect();
        let rows = lines
            .map(|l| l.split(',').map(String::from).collect())
            .collect();
        (header, rows)
    }
}

fn run_ok(lines: &[String]) -> Run {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pilot.jsonl");
    std::fs::write(&input, lines.join("\n")).unwrap();
    let out = dir.path().join("results");

    pilotscore(dir.path())
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    Run { _dir: dir, out }
}

fn full_case(id: &str, a: f64, e: f64, c: f64, s: f64) -> String {
    let (a, e, c, s) = (a.to_string(), e.to_string(), c.to_string(), s.to_string());
    record(
        id,
        &[
            ("accuracy", a.as_str()),
            ("explainability", e.as_str()),
            ("consistency", c.as_str()),
            ("safety", s.as_str()),
        ],
    )
}

#[test]
fn three_complete_records() {
    let run = run_ok(&[
        full_case("c1", 1.0, 2.0, 3.0, 4.0),
        full_case("c2", 2.0, 3.0, 4.0, 5.0),
        full_case("c3", 3.0, 4.0, 5.0, 1.0),
    ]);

    let (header, rows) = run.table("pilot_eval_scores.csv");
    assert_eq!(header, ["id", "accuracy", "explainability", "consistency", "safety"]);
    assert_eq!(rows.len(), 3);
    for row in &rows {
        for cell in &row[1..] {
            assert!(cell.parse::<f64>().is_ok(), "non-numeric cell {cell:?}");
        }
    }

    let (header, rows) = run.table("pilot_eval_summary.csv");
    assert_eq!(header, ["metric", "mean", "std", "min", "max", "count"]);
    let metrics: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(metrics, METRICS);
    assert!(rows.iter().all(|r| r[5] == "3"));
    assert_eq!(rows[0][1..5], ["2.0", "1.0", "1.0", "3.0"]);

    assert!(run.is_png("mean_scores_with_std.png"));
    for metric in METRICS {
        assert!(run.is_png(&format!("boxplot_{metric}.png")));
        assert!(run.is_png(&format!("frequencies_{metric}.png")));
    }
    assert!(!run.exists("mean_scores_with_std.svg"));
}

#[test]
fn frequency_buckets_sum_to_summary_counts() {
    let run = run_ok(&[
        full_case("c1", 1.2, 4.5, 3.0, 0.0),
        full_case("c2", 2.6, 3.5, 3.0, 9.0),
        record("c3", &[("accuracy", "\"4\""), ("safety", "2.5")]),
        record("c4", &[("accuracy", "\"bad\""), ("consistency", "5")]),
    ]);

    let (_, summary) = run.table("pilot_eval_summary.csv");
    let (header, freq) = run.table("pilot_eval_score_frequencies.csv");
    assert_eq!(
        header,
        ["metric", "score_1", "score_2", "score_3", "score_4", "score_5"]
    );

    for row in &freq {
        let total: usize = row[1..].iter().map(|c| c.parse::<usize>().unwrap()).sum();
        let count: usize = summary.iter().find(|s| s[0] == row[0]).unwrap()[5]
            .parse()
            .unwrap();
        assert_eq!(total, count, "{}", row[0]);
    }

    // half-even: 4.5 -> 4, 3.5 -> 4, 2.5 -> 2
    let explainability = freq.iter().find(|r| r[0] == "explainability").unwrap();
    assert_eq!(explainability[1..], ["0", "0", "0", "2", "0"]);
    let safety = freq.iter().find(|r| r[0] == "safety").unwrap();
    assert_eq!(safety[1..], ["1", "1", "0", "0", "1"]);
}

#[test]
fn malformed_line_is_skipped_silently() {
    let run = run_ok(&[
        full_case("c1", 4.0, 4.0, 4.0, 4.0),
        "{\"id\": \"broken\", \"eval\": ".to_string(),
        full_case("c2", 3.0, 3.0, 3.0, 3.0),
    ]);

    let (_, rows) = run.table("pilot_eval_scores.csv");
    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, ["c1", "c2"]);
}

#[test]
fn score_above_scale_lands_in_top_bucket() {
    let run = run_ok(&[full_case("c1", 5.6, 3.0, 3.0, 3.0)]);

    let (_, freq) = run.table("pilot_eval_score_frequencies.csv");
    assert_eq!(freq[0][0], "accuracy");
    assert_eq!(freq[0][1..], ["0", "0", "0", "0", "1"]);

    // a single value has no sample std
    let (_, summary) = run.table("pilot_eval_summary.csv");
    assert_eq!(summary[0][2], "");
}

#[test]
fn absent_metric_gets_no_charts() {
    let three = |id: &str, v: &str| {
        record(
            id,
            &[("accuracy", v), ("explainability", v), ("consistency", v)],
        )
    };
    let run = run_ok(&[three("a", "4"), three("b", "2")]);

    let (_, summary) = run.table("pilot_eval_summary.csv");
    assert_eq!(summary[3], ["safety", "", "", "", "", "0"]);

    assert!(!run.exists("boxplot_safety.png"));
    assert!(!run.exists("frequencies_safety.png"));
    assert!(run.exists("boxplot_accuracy.png"));

    let (_, freq) = run.table("pilot_eval_score_frequencies.csv");
    assert_eq!(freq.len(), 3);
    assert!(freq.iter().all(|r| r[0] != "safety"));

    let (_, rows) = run.table("pilot_eval_scores.csv");
    assert!(rows.iter().all(|r| r[4].is_empty()));
}

#[test]
fn missing_source_aborts_without_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("results");

    pilotscore(dir.path())
        .arg("run")
        .arg("--input")
        .arg(dir.path().join("missing.jsonl"))
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("file not found"));

    assert!(!out.exists());
}

#[test]
fn unparsable_source_aborts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pilot.jsonl");
    std::fs::write(&input, "garbage\n{\n\n").unwrap();

    pilotscore(dir.path())
        .arg("run")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid JSON objects"));
}

#[test]
fn all_scores_missing_aborts_with_no_data() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pilot.jsonl");
    let out = dir.path().join("results");
    std::fs::write(
        &input,
        [
            "{\"id\": \"a\"}".to_string(),
            record("b", &[("accuracy", "null"), ("safety", "\"n/a\"")]),
        ]
        .join("\n"),
    )
    .unwrap();

    pilotscore(dir.path())
        .arg("run")
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no rows contained evaluation scores after cleaning",
        ));

    assert!(!out.exists());
}

#[test]
fn half_away_rounding_is_selectable() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pilot.jsonl");
    std::fs::write(&input, record("a", &[("accuracy", "2.5")])).unwrap();
    let out = dir.path().join("results");

    pilotscore(dir.path())
        .args(["run", "--rounding", "half-away-from-zero", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let freq = std::fs::read_to_string(out.join("pilot_eval_score_frequencies.csv")).unwrap();
    assert!(freq.contains("accuracy,0,0,1,0,0"));
}
