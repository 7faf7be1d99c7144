//! Application state for the payroll API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::PayrollService;
use crate::store::MemoryStore;

/// Shared application state.
///
/// Holds the payroll service every handler works through.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService<MemoryStore>>,
}

impl AppState {
    /// Creates state around an empty in-memory store.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_service(PayrollService::new(MemoryStore::new(), config))
    }

    /// Creates state around an existing service.
    pub fn with_service(service: PayrollService<MemoryStore>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService<MemoryStore> {
        &self.service
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        self.service.config()
    }
}
