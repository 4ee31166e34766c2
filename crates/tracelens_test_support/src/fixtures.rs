use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use tracelens_core::{
    AnnotationSummary, Cursor, Edge, ExperimentMetrics, ExperimentPage, ExperimentRow, PageInfo,
    ScoreRange,
};

/// Deterministic experiment row. Rows built from distinct sequence numbers
/// get distinct ids, names, and timestamps.
pub fn experiment(sequence: u32) -> ExperimentRow {
    let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
        + Duration::minutes(sequence as i64);

    ExperimentRow {
        id: format!("exp-{sequence}").into(),
        name: format!("eval run #{sequence}"),
        description: None,
        created_at,
        sequence_number: sequence,
        project_id: Some("proj-default".to_string()),
        metrics: ExperimentMetrics {
            error_rate: Some(0.02),
            run_count: 20,
            average_latency_ms: Some(340.0),
            total_cost: Some(0.41),
            total_tokens: Some(18_200),
        },
        annotation_scores: HashMap::new(),
    }
}

/// Like [`experiment`] but with annotation aggregates attached.
/// Each entry is `(name, mean_score, annotated_count, error_count)`.
pub fn experiment_with_scores(
    sequence: u32,
    scores: &[(&str, f64, u64, u64)],
) -> ExperimentRow {
    let mut row = experiment(sequence);
    for (name, mean, count, errors) in scores {
        row.annotation_scores.insert(
            name.to_string(),
            AnnotationSummary {
                mean_score: Some(*mean),
                count: *count,
                error_count: *errors,
            },
        );
    }
    row
}

/// Wraps rows into a page, deriving per-edge cursors from the row ids.
pub fn page(rows: Vec<ExperimentRow>, end_cursor: Option<&str>, has_next_page: bool) -> ExperimentPage {
    let edges = rows
        .into_iter()
        .map(|node| {
            let cursor = Cursor::new(format!("cur:{}", node.id));
            Edge { node, cursor }
        })
        .collect();

    ExperimentPage {
        edges,
        page_info: PageInfo {
            end_cursor: end_cursor.map(Cursor::new),
            has_next_page,
        },
        annotation_ranges: HashMap::new(),
    }
}

/// A first page carrying the dataset-wide annotation ranges side channel.
pub fn page_with_ranges(
    rows: Vec<ExperimentRow>,
    end_cursor: Option<&str>,
    has_next_page: bool,
    ranges: &[(&str, f64, f64)],
) -> ExperimentPage {
    let mut result = page(rows, end_cursor, has_next_page);
    for (name, min, max) in ranges {
        result.annotation_ranges.insert(
            name.to_string(),
            ScoreRange {
                min_score: Some(*min),
                max_score: Some(*max),
            },
        );
    }
    result
}

/// `count` sequential rows starting at `start`.
pub fn experiments(start: u32, count: u32) -> Vec<ExperimentRow> {
    (start..start + count).map(experiment).collect()
}
