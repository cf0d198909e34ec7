//! Application state shared across all handlers

use std::sync::Arc;

use carlettos_persistence::PersistenceService;
use metrics_exporter_prometheus::PrometheusHandle;

use super::config::Configuration;

pub struct AppState {
    pub configuration: Configuration,
    /// Storage backend selected by `storage.mode`
    pub persistence: Arc<dyn PersistenceService>,
    /// Renders the `/metrics` page when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(configuration: Configuration, persistence: Arc<dyn PersistenceService>) -> Self {
        Self {
            configuration,
            persistence,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn persistence(&self) -> &dyn PersistenceService {
        self.persistence.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("storage_mode", &self.persistence.storage_mode())
            .finish()
    }
}
