//! Application state for the markdown generator.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use mdgen_storage::{ArtifactStore, Clock, SystemClock};

use crate::config::Config;
use crate::services::{GeneratorService, MarkdownRenderer};
use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configuration the state was built from.
    pub config: Arc<Config>,
    /// Retention-managed artifact store.
    pub store: ArtifactStore,
    /// Markdown generation service.
    pub generator: GeneratorService,
}

impl AppState {
    /// Create application state backed by the wall clock.
    pub async fn new(config: &Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Create application state with an explicit time source.
    pub async fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = ArtifactStore::open_with_clock(config.store_config(), clock).await?;

        let generator = GeneratorService::new(
            store.clone(),
            MarkdownRenderer::new(config.generator.tool_name.clone()),
            config.storage.sweep_on_write,
        );

        Ok(Self {
            config: Arc::new(config.clone()),
            store,
            generator,
        })
    }
}
