//! Integer bucketing of scores.

use crate::model::{Bucket, FrequencyRecord, RoundingMode, ScoreScale, ScoreTable};

/// Round a score and clamp it into the scale.
pub fn bucket_of(value: f64, rounding: RoundingMode, scale: &ScoreScale) -> i64 {
    // Saturating float → int cast keeps huge values inside i64 before clamping.
    scale.clamp(rounding.round(value) as i64)
}

/// Tally values into every bucket of the scale. Returns `None` for an empty
/// input so callers can skip metrics without data.
pub fn count_frequencies(
    metric: &str,
    values: &[f64],
    rounding: RoundingMode,
    scale: &ScoreScale,
) -> Option<FrequencyRecord> {
    if values.is_empty() {
        return None;
    }

    let mut buckets: Vec<Bucket> = scale
        .buckets()
        .map(|score| Bucket { score, count: 0 })
        .collect();
    for &value in values {
        let index = (bucket_of(value, rounding, scale) - scale.low) as usize;
        buckets[index].count += 1;
    }

    Some(FrequencyRecord {
        metric: metric.to_string(),
        buckets,
    })
}

/// Frequency records for every metric with data, in metric-set order.
pub fn frequencies(
    table: &ScoreTable,
    rounding: RoundingMode,
    scale: &ScoreScale,
) -> Vec<FrequencyRecord> {
    table
        .metrics
        .iter()
        .enumerate()
        .filter_map(|(i, metric)| count_frequencies(metric, &table.column(i), rounding, scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MetricSet, Row};

    const SCALE: ScoreScale = ScoreScale { low: 1, high: 5 };

    #[test]
    fn rounds_then_clamps() {
        let even = RoundingMode::HalfEven;
        assert_eq!(bucket_of(5.6, even, &SCALE), 5);
        assert_eq!(bucket_of(0.2, even, &SCALE), 1);
        assert_eq!(bucket_of(-3.0, even, &SCALE), 1);
        assert_eq!(bucket_of(3.4, even, &SCALE), 3);
        assert_eq!(bucket_of(1e300, even, &SCALE), 5);
    }

    #[test]
    fn ties_follow_the_configured_mode() {
        assert_eq!(bucket_of(2.5, RoundingMode::HalfEven, &SCALE), 2);
        assert_eq!(bucket_of(3.5, RoundingMode::HalfEven, &SCALE), 4);
        assert_eq!(bucket_of(2.5, RoundingMode::HalfAwayFromZero, &SCALE), 3);
        assert_eq!(bucket_of(4.5, RoundingMode::HalfEven, &SCALE), 4);
        assert_eq!(bucket_of(4.5, RoundingMode::HalfAwayFromZero, &SCALE), 5);
    }

    #[test]
    fn counts_cover_every_bucket_and_sum_to_input() {
        let values = [1.0, 2.2, 2.0, 4.9, 5.6, 7.0];
        let record =
            count_frequencies("accuracy", &values, RoundingMode::HalfEven, &SCALE).unwrap();
        let counts: Vec<usize> = record.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 0, 0, 3]);
        assert_eq!(record.total(), values.len());
        assert_eq!(record.count_for(3), 0);
        assert_eq!(record.count_for(9), 0);
    }

    #[test]
    fn bucketing_is_idempotent_on_in_range_integers() {
        let values = [1.0, 2.0, 3.0, 3.0, 5.0];
        let first = count_frequencies("m", &values, RoundingMode::HalfEven, &SCALE).unwrap();
        let rebucketed: Vec<f64> = values
            .iter()
            .map(|&v| bucket_of(v, RoundingMode::HalfEven, &SCALE) as f64)
            .collect();
        let second = count_frequencies("m", &rebucketed, RoundingMode::HalfEven, &SCALE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn metrics_without_values_are_omitted() {
        let table = ScoreTable {
            metrics: MetricSet::new(["a", "b", "c"]).unwrap(),
            rows: vec![
                Row {
                    id: None,
                    scores: vec![Some(1.0), None, Some(3.0)],
                },
                Row {
                    id: None,
                    scores: vec![Some(2.0), None, None],
                },
            ],
        };
        let records = frequencies(&table, RoundingMode::HalfEven, &SCALE);
        let names: Vec<_> = records.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn custom_scale_changes_bucket_range() {
        let scale = ScoreScale { low: 0, high: 2 };
        let record =
            count_frequencies("m", &[0.4, 1.6, 9.0], RoundingMode::HalfEven, &scale).unwrap();
        let scores: Vec<i64> = record.buckets.iter().map(|b| b.score).collect();
        assert_eq!(scores, vec![0, 1, 2]);
        assert_eq!(record.count_for(2), 2);
    }
}
