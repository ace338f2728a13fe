//! Axum route handlers for the dataset recommendation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::recommend::pipeline::{recommend, RecommendationOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
}

/// POST /api/v1/recommendations
///
/// Runs the dataset flow for one free-text query. Non-restaurant queries
/// return `outcome: needs_clarification` with a 200 status.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendationOutcome>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let outcome = recommend(
        &request.query,
        &state.dataset,
        state.recommender.as_ref(),
        &state.selector,
    )
    .await?;

    Ok(Json(outcome))
}
