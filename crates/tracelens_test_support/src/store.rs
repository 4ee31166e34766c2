use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tracelens_core::{
    ApiError, DeleteExperimentsRequest, ExperimentPage, ExperimentStore, PageRequest,
};

/// Requests observed by a [`ScriptedStore`], in call order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStoreStats {
    pub fetch_requests: Vec<PageRequest>,
    pub delete_requests: Vec<DeleteExperimentsRequest>,
}

#[derive(Default)]
struct ScriptedState {
    fetch_outcomes: Mutex<VecDeque<Result<ExperimentPage, ApiError>>>,
    delete_outcomes: Mutex<VecDeque<Result<(), ApiError>>>,
    stats: Mutex<ScriptedStoreStats>,
}

/// An [`ExperimentStore`] that replays queued outcomes and records every
/// request it sees. Calls past the end of the script fail loudly so a test
/// cannot silently over-fetch.
#[derive(Clone, Default)]
pub struct ScriptedStore {
    state: Arc<ScriptedState>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_page(&self, page: ExperimentPage) -> &Self {
        lock(&self.state.fetch_outcomes).push_back(Ok(page));
        self
    }

    pub fn queue_fetch_error(&self, error: ApiError) -> &Self {
        lock(&self.state.fetch_outcomes).push_back(Err(error));
        self
    }

    pub fn queue_delete_ok(&self) -> &Self {
        lock(&self.state.delete_outcomes).push_back(Ok(()));
        self
    }

    pub fn queue_delete_error(&self, error: ApiError) -> &Self {
        lock(&self.state.delete_outcomes).push_back(Err(error));
        self
    }

    pub fn stats(&self) -> ScriptedStoreStats {
        lock(&self.state.stats).clone()
    }

    pub fn fetch_count(&self) -> usize {
        lock(&self.state.stats).fetch_requests.len()
    }

    pub fn delete_count(&self) -> usize {
        lock(&self.state.stats).delete_requests.len()
    }
}

impl ExperimentStore for ScriptedStore {
    fn fetch_experiments(&self, request: &PageRequest) -> Result<ExperimentPage, ApiError> {
        lock(&self.state.stats).fetch_requests.push(request.clone());

        lock(&self.state.fetch_outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("no scripted fetch outcome left")))
    }

    fn delete_experiments(&self, request: &DeleteExperimentsRequest) -> Result<(), ApiError> {
        lock(&self.state.stats).delete_requests.push(request.clone());

        lock(&self.state.delete_outcomes)
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("no scripted delete outcome left")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
