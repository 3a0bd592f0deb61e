use std::sync::Arc;

use crate::config::Config;
use crate::export::OutputStore;
use crate::llm_client::TextGenerator;
use crate::retrieval::TrialSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Article source. Default: `PubMedScraper`.
    pub source: Arc<dyn TrialSource>,
    /// Text generator. Default: `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
    pub store: OutputStore,
}
