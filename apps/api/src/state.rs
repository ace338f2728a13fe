use std::sync::Arc;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::llm_client::ModelGateway;
use crate::nearby::maps::MapsProvider;
use crate::recommend::selector::SelectorConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub dataset: Arc<Dataset>,
    pub selector: SelectorConfig,
    /// Backend for the dataset flow (Ollama by default).
    pub recommender: Arc<dyn ModelGateway>,
    /// Hosted model for dish suggestions. `None` when OPENAI_API_KEY is unset.
    pub dish_model: Option<Arc<dyn ModelGateway>>,
    /// `None` when GOOGLE_MAPS_API_KEY is unset.
    pub maps: Option<Arc<dyn MapsProvider>>,
    pub config: Config,
}
