//! Generator service: request → markdown → stored artifact.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mdgen_storage::{slug, ArtifactStore};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{GenerateRequest, GenerateResponse};

use super::MarkdownRenderer;

/// Service for generating markdown files.
#[derive(Clone)]
pub struct GeneratorService {
    store: ArtifactStore,
    renderer: MarkdownRenderer,
    sweep_on_write: bool,
    sweep_in_flight: Arc<AtomicBool>,
}

impl GeneratorService {
    /// Create a new generator service.
    pub fn new(store: ArtifactStore, renderer: MarkdownRenderer, sweep_on_write: bool) -> Self {
        Self {
            store,
            renderer,
            sweep_on_write,
            sweep_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Validate, render, and store a document.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let doc = request.validate()?;
        let now = self.store.now();

        let markdown = self.renderer.render(&doc, now);
        let base = doc.filename.as_deref().unwrap_or(&doc.title);
        let filename = slug::timestamped_filename(base, now.timestamp_millis());

        debug!(
            title = %doc.title,
            style = doc.style.as_str(),
            sections = doc.sections.len(),
            "Rendering markdown"
        );

        let descriptor = self.store.write(&markdown, Some(&filename)).await?;

        info!(
            artifact_id = %descriptor.id,
            filename = %descriptor.display_name,
            file_size = descriptor.size_bytes,
            word_count = descriptor.word_count,
            "Markdown generated"
        );

        self.maybe_sweep();

        Ok(GenerateResponse {
            download_url: descriptor.url,
            filename: descriptor.display_name,
            file_size: descriptor.size_bytes,
            word_count: descriptor.word_count,
            expires_at: descriptor.expires_at,
        })
    }

    /// Spawn a background sweep unless one is already running.
    fn maybe_sweep(&self) {
        if !self.sweep_on_write || self.sweep_in_flight.swap(true, Ordering::AcqRel) {
            return;
        }

        let store = self.store.clone();
        let in_flight = self.sweep_in_flight.clone();
        tokio::spawn(async move {
            let purged = store.sweep_now().await;
            in_flight.store(false, Ordering::Release);
            debug!(purged, "Opportunistic sweep finished");
        });
    }
}
