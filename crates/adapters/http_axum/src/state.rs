//! Shared application state for axum handlers.

use std::sync::Arc;

use lumen_app::processor::ProcessorHandle;
use lumen_domain::config::RegionsConfig;

/// Application state shared across all axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Entry point to the serialized command processor.
    pub processor: ProcessorHandle,
    /// Static region configuration, used to validate requests up front.
    pub regions: Arc<RegionsConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(processor: ProcessorHandle, regions: Arc<RegionsConfig>) -> Self {
        Self { processor, regions }
    }
}
