//! In-process demo dataset so the app is useful without a backend.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use tracelens_core::{
    AnnotationSummary, ApiError, Cursor, DeleteExperimentsRequest, Edge, ExperimentId,
    ExperimentMetrics, ExperimentPage, ExperimentRow, ExperimentStore, PageInfo, PageRequest,
    ScoreRange,
};
use uuid::Uuid;

const ANNOTATIONS: &[&str] = &["conciseness", "correctness", "hallucination"];

const MODELS: &[&str] = &[
    "gpt-4o baseline",
    "claude prompt v2",
    "llama-70b tuned",
    "rerank ablation",
    "few-shot sweep",
];

/// Deterministic-ish noise in [0, 1) from a row seed, so the dataset is
/// stable within a run without pulling in a rand dependency.
fn noise(seed: u64) -> f64 {
    let hashed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(31);
    (hashed % 10_000) as f64 / 10_000.0
}

/// An [`ExperimentStore`] over a generated in-memory dataset. Cursors are
/// plain offsets into the row list; deletes actually remove rows so a
/// refetch after a bulk delete shows the shrunken dataset.
pub struct DemoStore {
    rows: Mutex<Vec<ExperimentRow>>,
    ranges: HashMap<String, ScoreRange>,
}

impl DemoStore {
    pub fn generate() -> Self {
        let now = Utc::now();
        let total = 320u32;

        // Newest first, matching the listing's descending created-at sort.
        let rows: Vec<ExperimentRow> = (0..total)
            .rev()
            .map(|seq| {
                let age_minutes = 7 * (total - 1 - seq) as i64;
                Self::generate_row(seq, now - Duration::minutes(age_minutes))
            })
            .collect();

        let mut ranges = HashMap::new();
        for name in ANNOTATIONS {
            let scores: Vec<f64> = rows
                .iter()
                .filter_map(|row| row.annotation(name).and_then(|s| s.mean_score))
                .collect();
            if scores.is_empty() {
                continue;
            }
            let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
            let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            ranges.insert(
                name.to_string(),
                ScoreRange {
                    min_score: Some(min),
                    max_score: Some(max),
                },
            );
        }

        Self {
            rows: Mutex::new(rows),
            ranges,
        }
    }

    fn generate_row(seq: u32, created_at: chrono::DateTime<Utc>) -> ExperimentRow {
        let seed = seq as u64;
        let run_count = 20 + (noise(seed) * 100.0) as u64;

        let mut annotation_scores = HashMap::new();
        for (ix, name) in ANNOTATIONS.iter().enumerate() {
            let entry_seed = seed.wrapping_add(1000 + ix as u64 * 7);
            // Some rows simply have no aggregate for an annotation.
            if noise(entry_seed) > 0.9 {
                continue;
            }
            let annotated = (run_count as f64 * (0.6 + noise(entry_seed + 1) * 0.4)) as u64;
            annotation_scores.insert(
                name.to_string(),
                AnnotationSummary {
                    mean_score: Some(0.2 + noise(entry_seed + 2) * 0.8),
                    count: annotated.min(run_count),
                    error_count: if noise(entry_seed + 3) > 0.8 { 1 } else { 0 },
                },
            );
        }

        ExperimentRow {
            id: ExperimentId::new(Uuid::new_v4().to_string()),
            name: format!("{} · run {:03}", MODELS[seq as usize % MODELS.len()], seq),
            description: (seq % 3 == 0)
                .then(|| format!("Scheduled evaluation over the golden dataset, batch {seq}")),
            created_at,
            sequence_number: seq,
            project_id: (seq % 7 != 0).then(|| "demo-project".to_string()),
            metrics: ExperimentMetrics {
                error_rate: (seq % 5 != 4).then(|| noise(seed + 11) * 0.08),
                run_count,
                average_latency_ms: Some(200.0 + noise(seed + 12) * 900.0),
                total_cost: Some(0.05 + noise(seed + 13) * 2.5),
                total_tokens: Some(4_000 + (noise(seed + 14) * 90_000.0) as u64),
            },
            annotation_scores,
        }
    }
}

impl ExperimentStore for DemoStore {
    fn fetch_experiments(&self, request: &PageRequest) -> Result<ExperimentPage, ApiError> {
        let rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());

        let offset = match &request.after {
            Some(cursor) => cursor
                .as_str()
                .parse::<usize>()
                .map_err(|_| ApiError::InvalidResponse(format!("bad cursor: {cursor}")))?,
            None => 0,
        };

        let end = (offset + request.first).min(rows.len());
        let edges: Vec<Edge> = rows[offset.min(rows.len())..end]
            .iter()
            .cloned()
            .enumerate()
            .map(|(ix, node)| Edge {
                node,
                cursor: Cursor::new((offset + ix + 1).to_string()),
            })
            .collect();

        let has_next_page = end < rows.len();
        let page_info = PageInfo {
            end_cursor: (!edges.is_empty()).then(|| Cursor::new(end.to_string())),
            has_next_page,
        };

        // The ranges side channel rides along with the first page only.
        let annotation_ranges = if request.after.is_none() {
            self.ranges.clone()
        } else {
            HashMap::new()
        };

        Ok(ExperimentPage {
            edges,
            page_info,
            annotation_ranges,
        })
    }

    fn delete_experiments(&self, request: &DeleteExperimentsRequest) -> Result<(), ApiError> {
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        rows.retain(|row| !request.ids.contains(&row.id));
        Ok(())
    }
}
