//! Maps collaborator: geocoding, places text search and place details.
//!
//! `MapsProvider` is the seam the nearby service depends on. `GoogleMapsClient`
//! is the production backend (Geocoding API + Places API v1). Each call has
//! its own bounded timeout and is never retried.

use std::cmp::Ordering;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::place::{GeoLocation, Place, PlaceContext};

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const PLACES_BASE_URL: &str = "https://places.googleapis.com/v1";
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

const GEOCODE_TIMEOUT: Duration = Duration::from_secs(8);
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);
const DETAILS_TIMEOUT: Duration = Duration::from_secs(6);

/// Candidates requested from the text search before ranking.
const SEARCH_RESULT_COUNT: u32 = 20;
/// Largest location-bias radius the Places API accepts.
pub const MAX_RADIUS_METERS: f64 = 50_000.0;
/// Places kept after ranking.
pub const MAX_PLACES: usize = 5;

const SEARCH_FIELD_MASK: &str = "places.id,places.name,places.displayName,places.rating,\
places.userRatingCount,places.formattedAddress,places.photos";
const DETAILS_FIELDS: &str = "types,primaryType,primaryTypeDisplayName,editorialSummary";

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait MapsProvider: Send + Sync {
    /// Returns `Ok(None)` when the address could not be resolved.
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>, MapsError>;

    /// Returns at most `MAX_PLACES` places, best first.
    async fn search_text(
        &self,
        lat: f64,
        lng: f64,
        keyword: &str,
        radius_meters: f64,
    ) -> Result<Vec<Place>, MapsError>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceContext, MapsError>;
}

/// Sorts by rating, then rating count, both descending, and keeps the top `MAX_PLACES`.
pub fn rank_places(mut places: Vec<Place>) -> Vec<Place> {
    places.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
            .then(b.user_ratings_total.cmp(&a.user_ratings_total))
    });
    places.truncate(MAX_PLACES);
    places
}

/// Google Maps search link for a place, query encoded like a form field.
pub fn maps_search_url(name: &str, address: &str) -> String {
    let query: String =
        url::form_urlencoded::byte_serialize(format!("{name} {address}").as_bytes()).collect();
    format!("{MAPS_SEARCH_URL}{query}")
}

// ────────────────────────────────────────────────────────────────────────────
// Wire formats
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    #[serde(default)]
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<RawPlace>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlace {
    id: Option<String>,
    name: Option<String>,
    display_name: Option<LocalizedText>,
    rating: Option<f64>,
    user_rating_count: Option<u64>,
    formatted_address: Option<String>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceDetailsResponse {
    #[serde(default)]
    types: Vec<String>,
    primary_type: Option<String>,
    primary_type_display_name: Option<LocalizedText>,
    editorial_summary: Option<LocalizedText>,
}

// ────────────────────────────────────────────────────────────────────────────
// Google backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    geocode_url: String,
    places_base_url: String,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(api_key, GEOCODE_URL, PLACES_BASE_URL)
    }

    pub fn with_endpoints(api_key: String, geocode_url: &str, places_base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            geocode_url: geocode_url.to_string(),
            places_base_url: places_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn convert_place(&self, raw: RawPlace) -> Option<Place> {
        let name = raw
            .display_name
            .and_then(|d| d.text)
            .filter(|t| !t.is_empty())?;
        let address = raw.formatted_address.unwrap_or_default();

        let photo_url = raw
            .photos
            .into_iter()
            .next()
            .and_then(|p| p.name)
            .map(|photo| {
                format!(
                    "{}/{photo}/media?maxWidthPx=800&key={}",
                    self.places_base_url, self.api_key
                )
            })
            .unwrap_or_default();

        Some(Place {
            maps_url: maps_search_url(&name, &address),
            name,
            rating: raw.rating.unwrap_or(0.0),
            user_ratings_total: raw.user_rating_count.unwrap_or(0),
            address,
            place_id: raw.id.or(raw.name),
            photo_url,
        })
    }
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, MapsError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(MapsError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl MapsProvider for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeoLocation>, MapsError> {
        let response: GeocodeResponse = send_json(
            self.client
                .get(&self.geocode_url)
                .query(&[("address", address), ("key", self.api_key.as_str())])
                .timeout(GEOCODE_TIMEOUT),
        )
        .await?;

        if response.status != "OK" {
            warn!("Geocoding returned status {}", response.status);
            return Ok(None);
        }

        let Some(result) = response.results.into_iter().next() else {
            return Ok(None);
        };

        let city = result
            .address_components
            .into_iter()
            .find(|c| c.types.iter().any(|t| t == "locality"))
            .map(|c| c.long_name);

        Ok(Some(GeoLocation {
            lat: result.geometry.location.lat,
            lng: result.geometry.location.lng,
            city,
        }))
    }

    async fn search_text(
        &self,
        lat: f64,
        lng: f64,
        keyword: &str,
        radius_meters: f64,
    ) -> Result<Vec<Place>, MapsError> {
        let body = json!({
            "textQuery": keyword,
            "maxResultCount": SEARCH_RESULT_COUNT,
            "locationBias": {
                "circle": {
                    "center": {"latitude": lat, "longitude": lng},
                    "radius": radius_meters.min(MAX_RADIUS_METERS),
                }
            }
        });

        let response: SearchTextResponse = send_json(
            self.client
                .post(format!("{}/places:searchText", self.places_base_url))
                .header("X-Goog-Api-Key", &self.api_key)
                .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
                .json(&body)
                .timeout(SEARCH_TIMEOUT),
        )
        .await?;

        if let Some(error) = response.error {
            return Err(MapsError::Api {
                status: 200,
                message: error.to_string(),
            });
        }

        let found = response.places.len();
        let places: Vec<Place> = response
            .places
            .into_iter()
            .filter_map(|raw| self.convert_place(raw))
            .collect();
        debug!("Places search for {keyword:?} returned {found} places ({} named)", places.len());

        Ok(rank_places(places))
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceContext, MapsError> {
        let path = if place_id.starts_with("places/") {
            place_id.to_string()
        } else {
            format!("places/{place_id}")
        };

        let details: PlaceDetailsResponse = send_json(
            self.client
                .get(format!("{}/{path}", self.places_base_url))
                .query(&[("fields", DETAILS_FIELDS)])
                .header("X-Goog-Api-Key", &self.api_key)
                .timeout(DETAILS_TIMEOUT),
        )
        .await?;

        Ok(PlaceContext {
            types: details.types,
            primary_type: details.primary_type,
            primary_type_display: details.primary_type_display_name.and_then(|t| t.text),
            editorial_summary: details.editorial_summary.and_then(|t| t.text),
        })
    }
}
