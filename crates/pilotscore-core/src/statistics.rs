//! Descriptive statistics per metric.
//!
//! Every function works on the non-missing values of one metric and returns
//! `None` instead of a number when the statistic is undefined.

use crate::model::{BoxStats, ScoreTable, SummaryRecord};

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (`n - 1` denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Summarize one metric's values.
pub fn summarize_values(metric: &str, values: &[f64]) -> SummaryRecord {
    SummaryRecord {
        metric: metric.to_string(),
        mean: mean(values),
        std: sample_std(values),
        min: min(values),
        max: max(values),
        count: values.len(),
    }
}

/// One summary per metric, in metric-set order, including metrics with no data.
pub fn summarize(table: &ScoreTable) -> Vec<SummaryRecord> {
    table
        .metrics
        .iter()
        .enumerate()
        .map(|(i, metric)| summarize_values(metric, &table.column(i)))
        .collect()
}

/// Quantile of sorted data with linear interpolation between closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Box-plot statistics: quartiles, whiskers at 1.5·IQR clipped to the data,
/// and the points beyond them.
pub fn box_stats(metric: &str, values: &[f64]) -> Option<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| (low_fence..=high_fence).contains(v))
        .collect();
    let whisker_low = inside.first().copied().unwrap_or(q1);
    let whisker_high = inside.last().copied().unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxStats {
        metric: metric.to_string(),
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Box stats for every metric that has at least one value.
pub fn box_stats_for(table: &ScoreTable) -> Vec<BoxStats> {
    table
        .metrics
        .iter()
        .enumerate()
        .filter_map(|(i, metric)| box_stats(metric, &table.column(i)))
        .collect()
}
