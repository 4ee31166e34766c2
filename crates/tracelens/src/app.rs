use std::sync::Arc;

use tracelens_core::{AppConfig, ExperimentStore};

/// Application-wide state shared with the UI: the configured backend and
/// the store handle the grid fetches through.
pub struct AppState {
    config: AppConfig,
    store: Arc<dyn ExperimentStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ExperimentStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn ExperimentStore> {
        self.store.clone()
    }
}
