pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::nearby::handlers::handle_nearby;
use crate::recommend::handlers::handle_recommend;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/recommendations", post(handle_recommend))
        .route("/api/v1/nearby", post(handle_nearby))
        .with_state(state)
}
