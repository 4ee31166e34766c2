use crate::error::ApiError;
use crate::page::{DeleteExperimentsRequest, ExperimentPage, PageRequest};

/// A backend serving the experiments listing.
///
/// Implementations are invoked from the UI's background executor and may
/// block. The grid guarantees at most one `fetch_experiments` and at most
/// one `delete_experiments` call in flight per grid instance.
pub trait ExperimentStore: Send + Sync {
    fn fetch_experiments(&self, request: &PageRequest) -> Result<ExperimentPage, ApiError>;

    fn delete_experiments(&self, request: &DeleteExperimentsRequest) -> Result<(), ApiError>;
}
