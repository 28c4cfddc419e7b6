use std::sync::Arc;

use crate::enrichment::EnrichmentDispatcher;
use crate::storage::EntryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Entry persistence. Trait object so handlers and the pipeline can be
    /// exercised against the in-memory store in tests.
    pub store: Arc<dyn EntryStore>,
    /// Handle onto the background enrichment worker pool.
    pub enrichment: EnrichmentDispatcher,
}
