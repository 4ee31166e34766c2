use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::experiment::{ExperimentId, ExperimentRow};

/// Opaque continuation token. The client never inspects its contents, it
/// only hands the last seen cursor back to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort direction for the listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Columns the backend can order the listing by. Sorting is a fixed
/// server-side parameter of the query, not a grid feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    SequenceNumber,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

/// One page request against the experiments listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Resume after this cursor; `None` requests the first page.
    pub after: Option<Cursor>,
    /// Maximum number of rows to return.
    pub first: usize,
    pub sort: SortSpec,
}

impl PageRequest {
    pub fn first_page(first: usize, sort: SortSpec) -> Self {
        Self {
            after: None,
            first,
            sort,
        }
    }

    pub fn after(mut self, cursor: Cursor) -> Self {
        self.after = Some(cursor);
        self
    }
}

/// A row paired with the cursor that resumes after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub node: ExperimentRow,
    pub cursor: Cursor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<Cursor>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Dataset-wide score bounds for one annotation name. Supplied alongside
/// the first page only; the grid does not verify min <= max.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
}

/// One page of the experiments listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentPage {
    pub edges: Vec<Edge>,
    pub page_info: PageInfo,
    /// Populated on the first page, empty on continuation pages.
    #[serde(default)]
    pub annotation_ranges: HashMap<String, ScoreRange>,
}

impl ExperimentPage {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Bulk delete request. The backend reports success or failure for the
/// whole batch; there are no partial-success semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteExperimentsRequest {
    pub ids: Vec<ExperimentId>,
}

impl DeleteExperimentsRequest {
    pub fn new(ids: Vec<ExperimentId>) -> Self {
        Self { ids }
    }
}
