//! Delimited table output.
//!
//! Missing values are written as empty cells; numbers use the shortest
//! representation that round-trips (`4.0`, `3.3333333333333335`).

use std::path::Path;

use anyhow::{Context, Result};

use pilotscore_core::model::{FrequencyRecord, ScoreScale, ScoreTable, SummaryRecord};

/// Quote a field if it contains a delimiter, quote, or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render an optional number as a cell.
pub fn format_number(value: Option<f64>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

fn push_line(out: &mut String, cells: impl IntoIterator<Item = String>) {
    let line: Vec<String> = cells.into_iter().collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// One line per row: `id,<metric...>`.
pub fn tidy_csv(table: &ScoreTable) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        std::iter::once("id".to_string()).chain(table.metrics.iter().map(escape_field)),
    );
    for row in &table.rows {
        push_line(
            &mut out,
            std::iter::once(escape_field(row.id.as_deref().unwrap_or("")))
                .chain(row.scores.iter().map(|s| format_number(*s))),
        );
    }
    out
}

/// One line per metric: `metric,mean,std,min,max,count`.
pub fn summary_csv(summaries: &[SummaryRecord]) -> String {
    let mut out = String::from("metric,mean,std,min,max,count\n");
    for s in summaries {
        push_line(
            &mut out,
            [
                escape_field(&s.metric),
                format_number(s.mean),
                format_number(s.std),
                format_number(s.min),
                format_number(s.max),
                s.count.to_string(),
            ],
        );
    }
    out
}

/// One line per counted metric: `metric,score_<low>..score_<high>`.
pub fn frequency_csv(records: &[FrequencyRecord], scale: &ScoreScale) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        std::iter::once("metric".to_string())
            .chain(scale.buckets().map(|score| format!("score_{score}"))),
    );
    for r in records {
        push_line(
            &mut out,
            std::iter::once(escape_field(&r.metric))
                .chain(scale.buckets().map(|score| r.count_for(score).to_string())),
        );
    }
    out
}

/// Write table content to a file.
pub fn write_csv(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("failed to write table to {}", path.display()))
}
