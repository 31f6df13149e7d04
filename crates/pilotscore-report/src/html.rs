//! HTML dashboard generator.
//!
//! Produces a self-contained HTML file with all CSS/JS and charts inlined.

use anyhow::{Context, Result};
use std::path::Path;

use pilotscore_core::report::AnalysisReport;

use crate::chart::{box_plot, capitalize, frequency_chart, mean_std_chart};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.3}")).unwrap_or_else(|| "-".into())
}

/// Generate an HTML dashboard from an analysis report.
pub fn generate_html(report: &AnalysisReport) -> String {
    let mut html = String::new();
    let source = report
        .source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".into());

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>pilotscore report — {}</title>\n",
        html_escape(&source)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Pilot evaluation report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Source: <strong>{}</strong> | {} rows | {} records | {} skipped lines | {} dropped rows | {}</p>\n",
        html_escape(&source),
        report.load.rows,
        report.load.records,
        report.load.skipped_lines,
        report.load.dropped_rows,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Metric</th><th>Mean</th><th>Std</th><th>Min</th><th>Max</th><th>Count</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for s in &report.summaries {
        let class = if s.count == 0 { " class=\"empty\"" } else { "" };
        html.push_str(&format!(
            "<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            html_escape(&s.metric),
            cell(s.mean),
            cell(s.std),
            cell(s.min),
            cell(s.max),
            s.count,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str(&mean_std_chart(&report.summaries, &report.scale));
    html.push_str("</section>\n");

    // Per-metric distributions
    html.push_str("<section class=\"distributions\">\n");
    html.push_str("<h2>Distributions</h2>\n");
    for metric in report.table.metrics.iter() {
        let boxes = report.box_stats_for(metric);
        let freq = report.frequency(metric);
        if boxes.is_none() && freq.is_none() {
            continue;
        }
        html.push_str(&format!(
            "<div class=\"metric\">\n<h3>{}</h3>\n",
            html_escape(&capitalize(metric))
        ));
        if let Some(stats) = boxes {
            html.push_str(&box_plot(stats, &report.scale));
        }
        if let Some(record) = freq {
            html.push_str(&frequency_chart(record));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    // Rows
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Rows</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"rows\">\n<thead><tr>");
    html.push_str("<th onclick=\"sortTable(0)\">ID</th>");
    for (i, metric) in report.table.metrics.iter().enumerate() {
        html.push_str(&format!(
            "<th onclick=\"sortTable({})\">{}</th>",
            i + 1,
            html_escape(metric)
        ));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &report.table.rows {
        html.push_str(&format!(
            "<tr><td>{}</td>",
            html_escape(row.id.as_deref().unwrap_or("-"))
        ));
        for score in &row.scores {
            html.push_str(&format!(
                "<td>{}</td>",
                score.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
            ));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML dashboard to a file.
pub fn write_html_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --muted: #9ca3af; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --muted: #6b7280; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.empty { color: var(--muted); }
.metric { display: flex; flex-wrap: wrap; gap: 1rem; align-items: flex-start; }
.metric h3 { width: 100%; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; height: auto; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('rows');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
