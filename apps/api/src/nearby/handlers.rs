//! Axum route handlers for the nearby search API.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::nearby::service::{find_nearby, NearbyRequest, NearbyResponse};
use crate::state::AppState;

/// POST /api/v1/nearby
///
/// Geocodes the address, searches places for the cuisine and attaches dish
/// suggestions. Returns 503 when the maps key or dish model is not configured.
pub async fn handle_nearby(
    State(state): State<AppState>,
    Json(request): Json<NearbyRequest>,
) -> Result<Json<NearbyResponse>, AppError> {
    let maps = state.maps.as_ref().ok_or_else(|| {
        AppError::NotConfigured("Nearby search requires GOOGLE_MAPS_API_KEY".to_string())
    })?;
    let dish_model = state.dish_model.as_ref().ok_or_else(|| {
        AppError::NotConfigured("Dish suggestions require OPENAI_API_KEY".to_string())
    })?;

    let response = find_nearby(maps.as_ref(), dish_model.as_ref(), &request).await?;
    Ok(Json(response))
}
