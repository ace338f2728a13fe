//! Nearby search: geocode -> places search -> details -> dish suggestions.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::ModelGateway;
use crate::models::place::{GeoLocation, Place, PlaceContext};
use crate::nearby::cuisine::{cuisine_label, search_keyword};
use crate::nearby::dishes::suggest_dishes;
use crate::nearby::maps::MapsProvider;

pub const MILES_TO_METERS: f64 = 1609.34;
pub const DEFAULT_RADIUS_MILES: f64 = 3.0;
pub const ADDRESS_NOT_FOUND_MESSAGE: &str =
    "Unable to parse address. Please try another location.";

fn default_radius() -> f64 {
    DEFAULT_RADIUS_MILES
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyRequest {
    pub address: String,
    #[serde(default)]
    pub cuisine: String,
    #[serde(default = "default_radius")]
    pub radius_miles: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyRestaurant {
    #[serde(flatten)]
    pub place: Place,
    pub dish_recommendations: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyResponse {
    pub location: GeoLocation,
    pub cuisine_label: String,
    pub results: Vec<NearbyRestaurant>,
}

/// Runs the nearby flow.
///
/// A place-search failure is logged and yields an empty result list; an
/// unresolvable address is a validation error.
pub async fn find_nearby(
    maps: &dyn MapsProvider,
    gateway: &dyn ModelGateway,
    request: &NearbyRequest,
) -> Result<NearbyResponse, AppError> {
    let address = request.address.trim();
    if address.is_empty() {
        return Err(AppError::Validation(ADDRESS_NOT_FOUND_MESSAGE.to_string()));
    }
    if !request.radius_miles.is_finite() || request.radius_miles <= 0.0 {
        return Err(AppError::Validation(
            "radius_miles must be a positive number".to_string(),
        ));
    }

    let location = maps
        .geocode(address)
        .await
        .map_err(|e| AppError::Maps(format!("Geocoding failed: {e}")))?
        .ok_or_else(|| AppError::Validation(ADDRESS_NOT_FOUND_MESSAGE.to_string()))?;

    let radius_meters = request.radius_miles * MILES_TO_METERS;
    let places = maps
        .search_text(
            location.lat,
            location.lng,
            search_keyword(&request.cuisine),
            radius_meters,
        )
        .await
        .unwrap_or_else(|e| {
            warn!("Places text search failed: {e}");
            Vec::new()
        });
    info!(
        "Found {} places for cuisine {:?} within {radius_meters:.0}m",
        places.len(),
        request.cuisine
    );

    let label = cuisine_label(&request.cuisine);
    let mut results = Vec::with_capacity(places.len());
    for place in places {
        let context = fetch_context(maps, place.place_id.as_deref()).await;
        let dish_recommendations =
            suggest_dishes(gateway, &place, &context, location.city.as_deref(), label).await;
        results.push(NearbyRestaurant {
            place,
            dish_recommendations,
        });
    }

    Ok(NearbyResponse {
        location,
        cuisine_label: label.to_string(),
        results,
    })
}

/// Details are optional enrichment; failures degrade to an empty context.
async fn fetch_context(maps: &dyn MapsProvider, place_id: Option<&str>) -> PlaceContext {
    let Some(place_id) = place_id.filter(|id| !id.is_empty()) else {
        return PlaceContext::default();
    };
    maps.place_details(place_id).await.unwrap_or_else(|e| {
        warn!("Place details for {place_id} failed: {e}");
        PlaceContext::default()
    })
}
