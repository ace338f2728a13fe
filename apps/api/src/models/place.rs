use serde::{Deserialize, Serialize};

/// Result of geocoding a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    /// Locality component, when the geocoder reported one.
    pub city: Option<String>,
}

/// A restaurant returned by the places text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub rating: f64,
    pub user_ratings_total: u64,
    pub address: String,
    /// Opaque provider identifier, used to fetch details.
    pub place_id: Option<String>,
    pub maps_url: String,
    /// Empty when the provider returned no photo.
    pub photo_url: String,
}

/// Extra descriptive context fetched per place. All fields empty on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceContext {
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub primary_type_display: Option<String>,
    pub editorial_summary: Option<String>,
}
