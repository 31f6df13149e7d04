//! Score extraction from raw records.

use serde_json::Value;

use crate::loader::RawRecord;
use crate::model::{ExtractedRow, MetricSet};

/// A JSON value that counts as "present" for identifier fallback.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn render_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve the record identifier: `id`, falling back to `case_id`.
pub fn extract_id(record: &RawRecord) -> Option<String> {
    ["id", "case_id"]
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| is_truthy(v))
        .map(render_id)
}

/// Map one record to a row holding the raw `score` of every metric.
pub fn extract_row(record: &RawRecord, metrics: &MetricSet) -> ExtractedRow {
    let eval = record.get("eval").and_then(Value::as_object);

    let values = metrics
        .iter()
        .map(|metric| {
            eval.and_then(|e| e.get(metric))
                .and_then(Value::as_object)
                .and_then(|m| m.get("score"))
                .cloned()
        })
        .collect();

    ExtractedRow {
        id: extract_id(record),
        values,
    }
}

/// Extract every record, preserving order.
pub fn extract_rows(records: &[RawRecord], metrics: &MetricSet) -> Vec<ExtractedRow> {
    records.iter().map(|r| extract_row(r, metrics)).collect()
}
