use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque server-issued experiment identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExperimentId(String);

impl ExperimentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExperimentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ExperimentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Batch-level metrics reported by the backend. All values are nullable
/// except the run count; a missing value renders as a placeholder, never
/// as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentMetrics {
    #[serde(default)]
    pub error_rate: Option<f64>,
    #[serde(default)]
    pub run_count: u64,
    #[serde(default)]
    pub average_latency_ms: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub total_tokens: Option<u64>,
}

/// Per-annotation aggregate attached to a row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationSummary {
    #[serde(default)]
    pub mean_score: Option<f64>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub error_count: u64,
}

/// One experiment as listed in the grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRow {
    pub id: ExperimentId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sequence_number: u32,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub metrics: ExperimentMetrics,
    /// Keyed by annotation name. Not every annotation is present on every
    /// row; absent entries render as missing.
    #[serde(default)]
    pub annotation_scores: HashMap<String, AnnotationSummary>,
}

impl ExperimentRow {
    pub fn annotation(&self, name: &str) -> Option<&AnnotationSummary> {
        self.annotation_scores.get(name)
    }
}
