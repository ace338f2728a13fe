use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, dataset size and which optional flows are enabled.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "dataset_records": state.dataset.len(),
        "recommender": {
            "provider": state.recommender.provider_name(),
            "model": state.recommender.model_name(),
        },
        "nearby_enabled": state.maps.is_some() && state.dish_model.is_some(),
    }))
}
