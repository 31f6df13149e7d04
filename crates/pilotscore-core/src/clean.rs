//! Numeric coercion and row filtering.

use serde_json::Value;
use tracing::debug;

use crate::error::PipelineError;
use crate::model::{ExtractedRow, MetricSet, Row, ScoreTable};

/// Outcome of cleaning: the usable rows plus how many were dropped.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: ScoreTable,
    pub dropped_rows: usize,
}

/// Coerce a raw score to a finite number.
///
/// Numbers pass through, strings are parsed after trimming, everything
/// else (including `NaN`/`inf` strings) becomes missing.
pub fn coerce_score(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Coerce every row and drop the ones left without any score.
pub fn clean_rows(
    rows: Vec<ExtractedRow>,
    metrics: &MetricSet,
) -> Result<CleanedTable, PipelineError> {
    let total = rows.len();

    let cleaned: Vec<Row> = rows
        .into_iter()
        .map(|r| Row {
            id: r.id,
            scores: r
                .values
                .iter()
                .map(|v| v.as_ref().and_then(coerce_score))
                .collect(),
        })
        .filter(|r| !r.is_blank())
        .collect();

    if cleaned.is_empty() {
        return Err(PipelineError::NoScores);
    }

    let dropped_rows = total - cleaned.len();
    if dropped_rows > 0 {
        debug!("dropped {dropped_rows} row(s) without any score");
    }

    Ok(CleanedTable {
        table: ScoreTable {
            metrics: metrics.clone(),
            rows: cleaned,
        },
        dropped_rows,
    })
}
