//! Core data model types for pilotscore.
//!
//! Rows, summaries and frequency tallies are all aligned with a
//! [`MetricSet`], so the pipeline never hardcodes which metrics exist.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Metric names used when no other list is configured.
pub const DEFAULT_METRICS: [&str; 4] = ["accuracy", "explainability", "consistency", "safety"];

/// An ordered, duplicate-free list of metric names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct MetricSet(Vec<String>);

impl MetricSet {
    /// Build a metric set, rejecting empty lists, blank names and duplicates.
    pub fn new<I, S>(names: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(|n| n.into().trim().to_string()).collect();
        if names.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "at least one metric is required".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for name in &names {
            if name.is_empty() {
                return Err(PipelineError::InvalidConfig("metric names must not be blank".into()));
            }
            // names become part of output file names
            if name.contains(['/', '\\']) || name.contains("..") {
                return Err(PipelineError::InvalidConfig(format!(
                    "metric name must not contain path separators or '..': {name}"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(PipelineError::InvalidConfig(format!(
                    "duplicate metric: {name}"
                )));
            }
        }
        Ok(Self(names))
    }

    /// Parse a comma-separated list such as `"accuracy,safety"`.
    pub fn parse_list(list: &str) -> Result<Self, PipelineError> {
        Self::new(list.split(',').filter(|s| !s.trim().is_empty()))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn index_of(&self, metric: &str) -> Option<usize> {
        self.0.iter().position(|m| m == metric)
    }
}

impl Default for MetricSet {
    fn default() -> Self {
        Self(DEFAULT_METRICS.iter().map(|m| m.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for MetricSet {
    type Error = PipelineError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(names)
    }
}

impl From<MetricSet> for Vec<String> {
    fn from(set: MetricSet) -> Self {
        set.0
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// How `x.5` ties are resolved when bucketing scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour: 2.5 → 2, 3.5 → 4.
    #[default]
    HalfEven,
    /// Ties go away from zero: 2.5 → 3, 3.5 → 4.
    HalfAwayFromZero,
}

impl RoundingMode {
    pub fn round(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfEven => value.round_ties_even(),
            RoundingMode::HalfAwayFromZero => value.round(),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::HalfEven => write!(f, "half-even"),
            RoundingMode::HalfAwayFromZero => write!(f, "half-away-from-zero"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half-even" | "even" | "bankers" => Ok(RoundingMode::HalfEven),
            "half-away-from-zero" | "half-up" | "away" => Ok(RoundingMode::HalfAwayFromZero),
            other => Err(format!("unknown rounding mode: {other}")),
        }
    }
}

/// Inclusive integer range that frequency buckets are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreScale {
    pub low: i64,
    pub high: i64,
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self { low: 1, high: 5 }
    }
}

impl ScoreScale {
    /// Largest accepted `high`; bounds the bucket count and the chart axis.
    pub const MAX_HIGH: i64 = 100;

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.low < 0 || self.low > self.high || self.high > Self::MAX_HIGH {
            return Err(PipelineError::InvalidConfig(format!(
                "score scale must satisfy 0 <= low <= high <= {}, got {}..={}",
                Self::MAX_HIGH,
                self.low,
                self.high
            )));
        }
        Ok(())
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.low, self.high)
    }

    pub fn buckets(&self) -> RangeInclusive<i64> {
        self.low..=self.high
    }

    /// Upper bound of the y axis on score-valued charts.
    pub fn axis_max(&self) -> f64 {
        self.high as f64
    }
}

/// A record after extraction, before any numeric coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    pub id: Option<String>,
    /// One raw `score` value per metric, `None` where the record had none.
    pub values: Vec<Option<serde_json::Value>>,
}

/// A cleaned row: one optional numeric score per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: Option<String>,
    pub scores: Vec<Option<f64>>,
}

impl Row {
    /// `true` when no metric has a value.
    pub fn is_blank(&self) -> bool {
        self.scores.iter().all(Option::is_none)
    }
}

/// Cleaned rows together with the metrics their scores are aligned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub metrics: MetricSet,
    pub rows: Vec<Row>,
}

impl ScoreTable {
    /// Non-missing values of the metric at `index`, in row order.
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.scores.get(index).copied().flatten())
            .collect()
    }

    /// Non-missing values of a metric by name.
    pub fn values(&self, metric: &str) -> Vec<f64> {
        self.metrics
            .index_of(metric)
            .map(|i| self.column(i))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Descriptive statistics for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub metric: String,
    pub mean: Option<f64>,
    /// Sample standard deviation; undefined below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: usize,
}

/// The numbers behind a box plot of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub metric: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// One integer bucket of a frequency tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub score: i64,
    pub count: usize,
}

/// Bucketed tally of one metric's scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub metric: String,
    pub buckets: Vec<Bucket>,
}

impl FrequencyRecord {
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn count_for(&self, score: i64) -> usize {
        self.buckets
            .iter()
            .find(|b| b.score == score)
            .map(|b| b.count)
            .unwrap_or(0)
    }
}
