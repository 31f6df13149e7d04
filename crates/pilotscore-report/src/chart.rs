//! SVG chart rendering.
//!
//! Every chart is a standalone SVG document with a title, labelled axes and
//! horizontal gridlines. Score-valued charts pin the y axis to
//! `[0, scale.high]`.

use pilotscore_core::model::{BoxStats, FrequencyRecord, ScoreScale, SummaryRecord};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;

const BAR_FILL: &str = "#3b82f6";
const BOX_FILL: &str = "#bfdbfe";
const INK: &str = "#1f2937";
const GRID: &str = "#e5e7eb";

/// Escape text for use inside SVG/XML.
pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `accuracy` → `Accuracy`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A plotting area with a linear y axis starting at zero.
struct Frame {
    y_max: f64,
    ticks: Vec<f64>,
}

impl Frame {
    fn new(y_max: f64, ticks: Vec<f64>) -> Self {
        Self {
            y_max: if y_max > 0.0 { y_max } else { 1.0 },
            ticks,
        }
    }

    /// Frame for a score axis: one tick per integer up to `scale.high`.
    fn for_scale(scale: &ScoreScale) -> Self {
        let ticks = (0..=scale.high).map(|t| t as f64).collect();
        Self::new(scale.axis_max(), ticks)
    }

    /// Frame for a count axis with at most ~5 integer ticks.
    fn for_counts(max_count: usize) -> Self {
        let max_count = max_count.max(1);
        let step = max_count.div_ceil(5).max(1);
        let top = max_count.div_ceil(step) * step;
        let ticks = (0..=top).step_by(step).map(|t| t as f64).collect();
        Self::new(top as f64, ticks)
    }

    fn plot_width(&self) -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    /// Pixel row for a data value; values outside the axis are pinned to it.
    fn y(&self, value: f64) -> f64 {
        let clamped = value.clamp(0.0, self.y_max);
        MARGIN_TOP + self.plot_height() * (1.0 - clamped / self.y_max)
    }

    /// Centre and width of the `i`th of `n` equal bands along the x axis.
    fn band(&self, i: usize, n: usize) -> (f64, f64) {
        let width = self.plot_width() / n.max(1) as f64;
        (MARGIN_LEFT + width * (i as f64 + 0.5), width)
    }

    fn open(&self, svg: &mut String, title: &str, x_label: &str, y_label: &str) {
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">\n"
        ));
        svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"28\" font-size=\"16\" font-weight=\"bold\" text-anchor=\"middle\" fill=\"{INK}\">{}</text>\n",
            WIDTH / 2.0,
            svg_escape(title)
        ));

        for &tick in &self.ticks {
            let y = self.y(tick);
            svg.push_str(&format!(
                "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{GRID}\"/>\n",
                WIDTH - MARGIN_RIGHT
            ));
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"12\" text-anchor=\"end\" dominant-baseline=\"middle\" fill=\"{INK}\">{}</text>\n",
                MARGIN_LEFT - 8.0,
                tick
            ));
        }

        let bottom = self.y(0.0);
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{bottom:.1}\" stroke=\"{INK}\"/>\n"
        ));
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{bottom:.1}\" x2=\"{:.1}\" y2=\"{bottom:.1}\" stroke=\"{INK}\"/>\n",
            WIDTH - MARGIN_RIGHT
        ));

        if !x_label.is_empty() {
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\" fill=\"{INK}\">{}</text>\n",
                MARGIN_LEFT + self.plot_width() / 2.0,
                HEIGHT - 15.0,
                svg_escape(x_label)
            ));
        }
        let mid_y = MARGIN_TOP + self.plot_height() / 2.0;
        svg.push_str(&format!(
            "  <text x=\"20\" y=\"{mid_y:.1}\" font-size=\"13\" text-anchor=\"middle\" transform=\"rotate(-90 20 {mid_y:.1})\" fill=\"{INK}\">{}</text>\n",
            svg_escape(y_label)
        ));
    }

    fn x_tick_label(&self, svg: &mut String, x: f64, label: &str) {
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" fill=\"{INK}\">{}</text>\n",
            self.y(0.0) + 18.0,
            svg_escape(label)
        ));
    }
}

fn score_label(scale: &ScoreScale) -> String {
    format!("Score ({}–{})", scale.low, scale.high)
}

/// Combined bar chart of every metric's mean with ±std error bars.
///
/// A missing std draws no error bar; a missing mean draws no bar at all.
pub fn mean_std_chart(summaries: &[SummaryRecord], scale: &ScoreScale) -> String {
    let frame = Frame::for_scale(scale);
    let mut svg = String::new();
    frame.open(
        &mut svg,
        "Pilot Evaluation: Mean Scores ± Std",
        "Metric",
        &score_label(scale),
    );

    let n = summaries.len();
    for (i, s) in summaries.iter().enumerate() {
        let (cx, band) = frame.band(i, n);
        frame.x_tick_label(&mut svg, cx, &s.metric);

        let Some(mean) = s.mean else { continue };
        let bar_width = band * 0.6;
        let top = frame.y(mean);
        svg.push_str(&format!(
            "  <rect class=\"bar\" x=\"{:.1}\" y=\"{top:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{BAR_FILL}\"><title>{}: {mean:.3}</title></rect>\n",
            cx - bar_width / 2.0,
            frame.y(0.0) - top,
            svg_escape(&s.metric)
        ));

        let std = s.std.unwrap_or(0.0);
        if std > 0.0 {
            let (hi, lo) = (frame.y(mean + std), frame.y(mean - std));
            let cap = bar_width * 0.15;
            svg.push_str(&format!(
                "  <line class=\"error-bar\" x1=\"{cx:.1}\" y1=\"{hi:.1}\" x2=\"{cx:.1}\" y2=\"{lo:.1}\" stroke=\"{INK}\" stroke-width=\"1.5\"/>\n"
            ));
            for y in [hi, lo] {
                svg.push_str(&format!(
                    "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{INK}\" stroke-width=\"1.5\"/>\n",
                    cx - cap,
                    cx + cap
                ));
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Box plot of one metric's distribution.
pub fn box_plot(stats: &BoxStats, scale: &ScoreScale) -> String {
    let frame = Frame::for_scale(scale);
    let mut svg = String::new();
    frame.open(
        &mut svg,
        &format!("Distribution of {} Scores", capitalize(&stats.metric)),
        "",
        &score_label(scale),
    );

    let (cx, band) = frame.band(0, 1);
    let box_width = band * 0.25;
    let left = cx - box_width / 2.0;
    let (q1, q3, median) = (frame.y(stats.q1), frame.y(stats.q3), frame.y(stats.median));
    let (w_lo, w_hi) = (frame.y(stats.whisker_low), frame.y(stats.whisker_high));

    frame.x_tick_label(&mut svg, cx, &stats.metric);
    svg.push_str(&format!(
        "  <line class=\"whisker\" x1=\"{cx:.1}\" y1=\"{w_hi:.1}\" x2=\"{cx:.1}\" y2=\"{q3:.1}\" stroke=\"{INK}\"/>\n"
    ));
    svg.push_str(&format!(
        "  <line class=\"whisker\" x1=\"{cx:.1}\" y1=\"{q1:.1}\" x2=\"{cx:.1}\" y2=\"{w_lo:.1}\" stroke=\"{INK}\"/>\n"
    ));
    for y in [w_hi, w_lo] {
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{INK}\"/>\n",
            cx - box_width / 4.0,
            cx + box_width / 4.0
        ));
    }
    svg.push_str(&format!(
        "  <rect class=\"box\" x=\"{left:.1}\" y=\"{q3:.1}\" width=\"{box_width:.1}\" height=\"{:.1}\" fill=\"{BOX_FILL}\" stroke=\"{INK}\"/>\n",
        q1 - q3
    ));
    svg.push_str(&format!(
        "  <line class=\"median\" x1=\"{left:.1}\" y1=\"{median:.1}\" x2=\"{:.1}\" y2=\"{median:.1}\" stroke=\"#f97316\" stroke-width=\"2\"/>\n",
        left + box_width
    ));
    for &outlier in &stats.outliers {
        svg.push_str(&format!(
            "  <circle class=\"outlier\" cx=\"{cx:.1}\" cy=\"{:.1}\" r=\"3.5\" fill=\"none\" stroke=\"{INK}\"/>\n",
            frame.y(outlier)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Bar chart of bucket counts for one metric.
pub fn frequency_chart(record: &FrequencyRecord) -> String {
    let max_count = record.buckets.iter().map(|b| b.count).max().unwrap_or(0);
    let frame = Frame::for_counts(max_count);
    let mut svg = String::new();
    frame.open(
        &mut svg,
        &format!("{} Score Frequencies", capitalize(&record.metric)),
        "Score",
        "Count",
    );

    let n = record.buckets.len();
    for (i, bucket) in record.buckets.iter().enumerate() {
        let (cx, band) = frame.band(i, n);
        frame.x_tick_label(&mut svg, cx, &bucket.score.to_string());
        if bucket.count == 0 {
            continue;
        }
        let bar_width = band * 0.8;
        let top = frame.y(bucket.count as f64);
        svg.push_str(&format!(
            "  <rect class=\"bar\" x=\"{:.1}\" y=\"{top:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{BAR_FILL}\"><title>{}: {}</title></rect>\n",
            cx - bar_width / 2.0,
            frame.y(0.0) - top,
            bucket.score,
            bucket.count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilotscore_core::model::Bucket;

    fn summary(metric: &str, mean: Option<f64>, std: Option<f64>) -> SummaryRecord {
        SummaryRecord {
            metric: metric.into(),
            mean,
            std,
            min: mean,
            max: mean,
            count: usize::from(mean.is_some()),
        }
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("accuracy"), "Accuracy");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn score_axis_is_pinned_to_scale() {
        let frame = Frame::for_scale(&ScoreScale::default());
        assert_eq!(frame.y(0.0), HEIGHT - MARGIN_BOTTOM);
        assert_eq!(frame.y(5.0), MARGIN_TOP);
        // values above the axis are drawn at the top edge
        assert_eq!(frame.y(7.5), MARGIN_TOP);
        assert_eq!(frame.ticks.len(), 6);
    }

    #[test]
    fn count_axis_rounds_up_to_whole_steps() {
        let frame = Frame::for_counts(12);
        assert_eq!(frame.ticks, vec![0.0, 3.0, 6.0, 9.0, 12.0]);
        let frame = Frame::for_counts(0);
        assert_eq!(frame.y_max, 1.0);
    }

    #[test]
    fn mean_chart_draws_one_bar_per_defined_mean() {
        let summaries = vec![
            summary("accuracy", Some(4.0), Some(0.5)),
            summary("explainability", Some(3.0), None),
            summary("consistency", Some(2.0), Some(1.0)),
            summary("safety", None, None),
        ];
        let svg = mean_std_chart(&summaries, &ScoreScale::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("class=\"bar\"").count(), 3);
        assert_eq!(svg.matches("class=\"error-bar\"").count(), 2);
        assert!(svg.contains(">safety</text>"));
        assert!(svg.contains("Mean Scores ± Std"));
        // one element per line
        assert!(svg.lines().all(|l| l.trim_start().starts_with('<')));
    }

    #[test]
    fn box_plot_marks_outliers() {
        let stats = BoxStats {
            metric: "safety".into(),
            q1: 3.0,
            median: 3.5,
            q3: 4.0,
            whisker_low: 3.0,
            whisker_high: 4.0,
            outliers: vec![1.0],
        };
        let svg = box_plot(&stats, &ScoreScale::default());
        assert!(svg.contains("Distribution of Safety Scores"));
        assert_eq!(svg.matches("class=\"outlier\"").count(), 1);
        assert!(svg.contains("class=\"median\""));
    }

    #[test]
    fn frequency_chart_skips_empty_buckets() {
        let record = FrequencyRecord {
            metric: "accuracy".into(),
            buckets: vec![
                Bucket { score: 1, count: 0 },
                Bucket { score: 2, count: 2 },
                Bucket { score: 3, count: 1 },
            ],
        };
        let svg = frequency_chart(&record);
        assert!(svg.contains("Accuracy Score Frequencies"));
        assert_eq!(svg.matches("class=\"bar\"").count(), 2);
    }

    #[test]
    fn text_is_escaped() {
        let svg = mean_std_chart(&[summary("a<b", Some(1.0), None)], &ScoreScale::default());
        assert!(svg.contains("a&lt;b"));
        assert!(!svg.contains("a<b"));
    }
}
