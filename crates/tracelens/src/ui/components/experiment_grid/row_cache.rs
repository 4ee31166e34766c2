use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gpui::SharedString;
use tracelens_core::{AnnotationSummary, ExperimentId, ExperimentRow, ScoreRange, stats};

pub const MISSING_PLACEHOLDER: &str = "--";

/// One formatted metric cell. Missing values carry the placeholder text
/// and render muted; they are never coerced to zero.
#[derive(Debug, Clone)]
pub struct MetricCell {
    pub text: SharedString,
    pub is_missing: bool,
}

impl MetricCell {
    fn present(text: String) -> Self {
        Self {
            text: text.into(),
            is_missing: false,
        }
    }

    fn missing() -> Self {
        Self {
            text: MISSING_PLACEHOLDER.into(),
            is_missing: true,
        }
    }
}

/// One formatted annotation score cell.
#[derive(Debug, Clone)]
pub struct ScoreCell {
    pub text: SharedString,
    /// Bar fill as a percentage of the dataset score range. `None` when
    /// there is no score to place. Deliberately unclamped; the painted
    /// bar is bounded by the cell, the number is not.
    pub fill_percent: Option<f64>,
    pub missing_ratio: f64,
    /// Raw counts behind the missing indicator, e.g. "8 of 20 runs
    /// annotated". Present exactly when the indicator shows.
    pub missing_detail: Option<SharedString>,
}

impl ScoreCell {
    pub fn shows_missing_indicator(&self) -> bool {
        self.missing_ratio > 0.0
    }

    fn derive(summary: Option<&AnnotationSummary>, range: ScoreRange, run_count: u64) -> Self {
        let (text, fill_percent) = match summary.and_then(|s| s.mean_score) {
            Some(score) => (
                format_score(score).into(),
                Some(stats::score_percentile(
                    score,
                    range.min_score,
                    range.max_score,
                )),
            ),
            None => (SharedString::from(MISSING_PLACEHOLDER), None),
        };

        let annotated = summary.map(|s| s.count).unwrap_or(0);
        let missing_ratio = stats::unannotated_ratio(annotated, run_count);
        let missing_detail = (missing_ratio > 0.0)
            .then(|| format!("{annotated} of {run_count} runs annotated").into());

        Self {
            text,
            fill_percent,
            missing_ratio,
            missing_detail,
        }
    }
}

/// A fully formatted row, derived once per row list and reused across
/// frames. Width ticks during a column drag re-render the body against
/// these precomputed strings instead of touching the row data.
#[derive(Debug, Clone)]
pub struct DisplayRow {
    pub id: ExperimentId,
    pub name: SharedString,
    pub description: MetricCell,
    pub created_at: SharedString,
    pub error_rate: MetricCell,
    pub run_count: MetricCell,
    pub latency: MetricCell,
    pub cost: MetricCell,
    pub tokens: MetricCell,
    /// Parallel to the annotation column order.
    pub scores: Vec<ScoreCell>,
    pub project_id: Option<SharedString>,
}

impl DisplayRow {
    fn derive(
        row: &ExperimentRow,
        annotation_names: &[Arc<str>],
        ranges: &HashMap<String, ScoreRange>,
    ) -> Self {
        let metrics = &row.metrics;
        let scores = annotation_names
            .iter()
            .map(|name| {
                let range = ranges.get(name.as_ref()).copied().unwrap_or_default();
                ScoreCell::derive(row.annotation(name), range, metrics.run_count)
            })
            .collect();

        Self {
            id: row.id.clone(),
            name: row.name.clone().into(),
            description: match &row.description {
                Some(text) if !text.is_empty() => MetricCell::present(text.clone()),
                _ => MetricCell::missing(),
            },
            created_at: format_timestamp(row.created_at).into(),
            error_rate: metrics
                .error_rate
                .map(|v| MetricCell::present(format_error_rate(v)))
                .unwrap_or_else(MetricCell::missing),
            run_count: MetricCell::present(metrics.run_count.to_string()),
            latency: metrics
                .average_latency_ms
                .map(|v| MetricCell::present(format_latency(v)))
                .unwrap_or_else(MetricCell::missing),
            cost: metrics
                .total_cost
                .map(|v| MetricCell::present(format_cost(v)))
                .unwrap_or_else(MetricCell::missing),
            tokens: metrics
                .total_tokens
                .map(|v| MetricCell::present(format_tokens(v)))
                .unwrap_or_else(MetricCell::missing),
            scores,
            project_id: row.project_id.clone().map(Into::into),
        }
    }
}

/// Reference-equality cache over the formatted rows.
///
/// Derivation is keyed on the identity of the rows `Arc`: the pagination
/// controller replaces the `Arc` when (and only when) the row list
/// changes, so a pointer match means the cached rows are current. Sizing
/// and selection churn never invalidate it.
#[derive(Default)]
pub struct RowDisplayCache {
    source: Option<Arc<Vec<ExperimentRow>>>,
    rows: Vec<DisplayRow>,
    rebuilds: u64,
}

impl RowDisplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows_for(
        &mut self,
        source: &Arc<Vec<ExperimentRow>>,
        annotation_names: &[Arc<str>],
        ranges: &HashMap<String, ScoreRange>,
    ) -> &[DisplayRow] {
        let fresh = self
            .source
            .as_ref()
            .is_some_and(|cached| Arc::ptr_eq(cached, source));

        if !fresh {
            self.rows = source
                .iter()
                .map(|row| DisplayRow::derive(row, annotation_names, ranges))
                .collect();
            self.source = Some(source.clone());
            self.rebuilds += 1;
        }

        &self.rows
    }

    /// The rows derived by the last [`Self::rows_for`] call.
    pub fn cached(&self) -> &[DisplayRow] {
        &self.rows
    }

    /// Forces the next `rows_for` to re-derive, e.g. after the annotation
    /// ranges change without the row list changing.
    pub fn invalidate(&mut self) {
        self.source = None;
        self.rows.clear();
    }

    #[cfg(test)]
    fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

fn format_error_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn format_latency(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{ms:.0} ms")
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

fn format_cost(cost: f64) -> String {
    format!("${cost:.4}")
}

fn format_tokens(tokens: u64) -> String {
    if tokens < 1_000 {
        tokens.to_string()
    } else if tokens < 1_000_000 {
        format!("{:.1}k", tokens as f64 / 1_000.0)
    } else {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_test_support::fixtures::{experiment, experiment_with_scores};

    fn names() -> Vec<Arc<str>> {
        vec!["correctness".into()]
    }

    fn ranges() -> HashMap<String, ScoreRange> {
        HashMap::from([(
            "correctness".to_string(),
            ScoreRange {
                min_score: Some(0.0),
                max_score: Some(1.0),
            },
        )])
    }

    #[test]
    fn cache_reuses_rows_for_pointer_equal_source() {
        let source = Arc::new(vec![experiment(1), experiment(2)]);
        let mut cache = RowDisplayCache::new();

        cache.rows_for(&source, &names(), &ranges());
        cache.rows_for(&source.clone(), &names(), &ranges());

        assert_eq!(cache.rebuilds(), 1);
    }

    #[test]
    fn cache_rederives_when_the_row_list_grows() {
        let source = Arc::new(vec![experiment(1)]);
        let mut cache = RowDisplayCache::new();
        assert_eq!(cache.rows_for(&source, &names(), &ranges()).len(), 1);

        let mut grown = (*source).clone();
        grown.push(experiment(2));
        let grown = Arc::new(grown);

        assert_eq!(cache.rows_for(&grown, &names(), &ranges()).len(), 2);
        assert_eq!(cache.rebuilds(), 2);
    }

    #[test]
    fn invalidate_forces_a_rederive_for_the_same_source() {
        let source = Arc::new(vec![experiment(1)]);
        let mut cache = RowDisplayCache::new();
        cache.rows_for(&source, &names(), &ranges());

        cache.invalidate();
        cache.rows_for(&source, &names(), &ranges());

        assert_eq!(cache.rebuilds(), 2);
    }

    #[test]
    fn score_cell_places_the_mean_within_the_range() {
        let row = experiment_with_scores(1, &[("correctness", 0.8, 20, 0)]);
        let source = Arc::new(vec![row]);
        let mut cache = RowDisplayCache::new();

        let rows = cache.rows_for(&source, &names(), &ranges());
        let cell = &rows[0].scores[0];
        assert_eq!(cell.text.as_ref(), "0.80");
        assert_eq!(cell.fill_percent, Some(80.0));
    }

    #[test]
    fn fully_annotated_cell_suppresses_the_missing_indicator() {
        // A ratio of exactly zero renders nothing, not a zero-width
        // indicator.
        let row = experiment_with_scores(1, &[("correctness", 0.5, 20, 0)]);
        let source = Arc::new(vec![row]);
        let mut cache = RowDisplayCache::new();

        let cell = &cache.rows_for(&source, &names(), &ranges())[0].scores[0];
        assert_eq!(cell.missing_ratio, 0.0);
        assert!(!cell.shows_missing_indicator());
        assert!(cell.missing_detail.is_none());
    }

    #[test]
    fn partially_annotated_cell_reports_raw_counts() {
        let row = experiment_with_scores(1, &[("correctness", 0.5, 8, 0)]);
        let source = Arc::new(vec![row]);
        let mut cache = RowDisplayCache::new();

        let cell = &cache.rows_for(&source, &names(), &ranges())[0].scores[0];
        assert!(cell.shows_missing_indicator());
        assert_eq!(
            cell.missing_detail.as_ref().unwrap().as_ref(),
            "8 of 20 runs annotated"
        );
    }

    #[test]
    fn absent_annotation_entry_renders_placeholder_not_zero() {
        let source = Arc::new(vec![experiment(1)]);
        let mut cache = RowDisplayCache::new();

        let cell = &cache.rows_for(&source, &names(), &ranges())[0].scores[0];
        assert_eq!(cell.text.as_ref(), MISSING_PLACEHOLDER);
        assert_eq!(cell.fill_percent, None);
        assert!(cell.shows_missing_indicator());
    }

    #[test]
    fn missing_metrics_render_placeholders() {
        let mut row = experiment(1);
        row.metrics.error_rate = None;
        row.metrics.average_latency_ms = None;
        row.metrics.total_cost = None;
        row.metrics.total_tokens = None;
        let source = Arc::new(vec![row]);
        let mut cache = RowDisplayCache::new();

        let display = &cache.rows_for(&source, &[], &HashMap::new())[0];
        for cell in [
            &display.error_rate,
            &display.latency,
            &display.cost,
            &display.tokens,
        ] {
            assert!(cell.is_missing);
            assert_eq!(cell.text.as_ref(), MISSING_PLACEHOLDER);
        }
        assert!(!display.run_count.is_missing);
    }

    #[test]
    fn metric_formatting_is_compact() {
        assert_eq!(format_error_rate(0.025), "2.5%");
        assert_eq!(format_latency(340.0), "340 ms");
        assert_eq!(format_latency(1250.0), "1.25 s");
        assert_eq!(format_cost(0.4125), "$0.4125");
        assert_eq!(format_tokens(950), "950");
        assert_eq!(format_tokens(18_200), "18.2k");
        assert_eq!(format_tokens(2_400_000), "2.4M");
    }
}
