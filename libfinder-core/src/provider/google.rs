use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    error::{LookupError, Result},
    model::{AddressComponent, GeoPoint, PlaceCandidate, PlaceDetail},
};

use super::PlacesProvider;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

const STATUS_OK: &str = "OK";
const DETAIL_FIELDS: &str = "name,formatted_address,geometry,address_component";

const GEOCODE: &str = "Google Geocoding";
const NEARBY_SEARCH: &str = "Google Places nearby search";
const TEXT_SEARCH: &str = "Google Places text search";
const PLACE_DETAILS: &str = "Google Places details";

/// Geocoding and Places lookups against the Google Maps Platform web services.
#[derive(Debug, Clone)]
pub struct GooglePlacesProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GooglePlacesProvider {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(LookupError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { api_key, base_url, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| LookupError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| LookupError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(LookupError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| LookupError::Malformed { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct GLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GGeometry {
    location: GLatLng,
}

#[derive(Debug, Deserialize)]
struct GGeocodeResult {
    geometry: GGeometry,
}

#[derive(Debug, Deserialize)]
struct GGeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GGeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GSearchResult {
    #[serde(default)]
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GSearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GSearchResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GDetailResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    formatted_address: String,
    #[serde(default)]
    geometry: Option<GGeometry>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct GDetailResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    result: Option<GDetailResult>,
    #[serde(default)]
    error_message: Option<String>,
}

fn geocode_point(address: &str, parsed: GGeocodeResponse) -> Option<GeoPoint> {
    if parsed.status != STATUS_OK {
        tracing::debug!(
            address,
            status = %parsed.status,
            error_message = ?parsed.error_message,
            "geocode returned no usable result"
        );
        return None;
    }

    // Ambiguous matches are not disambiguated; the first one is taken.
    parsed
        .results
        .into_iter()
        .next()
        .map(|r| GeoPoint::new(r.geometry.location.lat, r.geometry.location.lng))
}

fn search_candidates(endpoint: &str, parsed: GSearchResponse) -> Vec<PlaceCandidate> {
    if parsed.results.is_empty() && parsed.status != STATUS_OK {
        tracing::debug!(
            endpoint,
            status = %parsed.status,
            error_message = ?parsed.error_message,
            "search returned no results"
        );
    }

    parsed
        .results
        .into_iter()
        .filter_map(|r| r.place_id.filter(|id| !id.is_empty()))
        .map(PlaceCandidate::new)
        .collect()
}

fn place_detail(candidate: &PlaceCandidate, parsed: GDetailResponse) -> Option<PlaceDetail> {
    if parsed.status != STATUS_OK {
        tracing::warn!(
            place_id = %candidate.place_id,
            status = %parsed.status,
            error_message = ?parsed.error_message,
            "skipping place whose detail lookup failed"
        );
        return None;
    }

    let Some(result) = parsed.result else {
        tracing::warn!(place_id = %candidate.place_id, "skipping place with empty detail result");
        return None;
    };

    let Some(geometry) = result.geometry else {
        tracing::warn!(place_id = %candidate.place_id, "skipping place without geometry");
        return None;
    };

    Some(PlaceDetail {
        name: result.name,
        formatted_address: result.formatted_address,
        location: GeoPoint::new(geometry.location.lat, geometry.location.lng),
        address_components: result.address_components,
    })
}

#[async_trait]
impl PlacesProvider for GooglePlacesProvider {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>> {
        let parsed: GGeocodeResponse =
            self.get_json(GEOCODE, "geocode/json", &[("address", address)]).await?;

        Ok(geocode_point(address, parsed))
    }

    async fn nearby_search(
        &self,
        center: GeoPoint,
        radius_m: u32,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>> {
        let location = center.to_string();
        let radius = radius_m.to_string();

        let parsed: GSearchResponse = self
            .get_json(
                NEARBY_SEARCH,
                "place/nearbysearch/json",
                &[("location", location.as_str()), ("radius", radius.as_str()), ("type", category)],
            )
            .await?;

        Ok(search_candidates(NEARBY_SEARCH, parsed))
    }

    async fn text_search(&self, query: &str, category: &str) -> Result<Vec<PlaceCandidate>> {
        let parsed: GSearchResponse = self
            .get_json(TEXT_SEARCH, "place/textsearch/json", &[("query", query), ("type", category)])
            .await?;

        Ok(search_candidates(TEXT_SEARCH, parsed))
    }

    async fn place_details(&self, candidate: &PlaceCandidate) -> Result<Option<PlaceDetail>> {
        let parsed: GDetailResponse = self
            .get_json(
                PLACE_DETAILS,
                "place/details/json",
                &[("place_id", candidate.place_id.as_str()), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        Ok(place_detail(candidate, parsed))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
