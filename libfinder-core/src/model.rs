use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{distance, normalize::normalize};

static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{4,8}$").expect("postal code pattern is valid"));

/// Returns true for 5 to 9 digits with a non-zero leading digit.
pub fn is_postal_code(s: &str) -> bool {
    POSTAL_CODE.is_match(s)
}

/// A classified, trimmed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Postal(String),
    CityName(String),
}

impl Query {
    /// Classify raw user input. Blank input yields `None`.
    pub fn classify(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if is_postal_code(trimmed) {
            Some(Query::Postal(trimmed.to_string()))
        } else {
            Some(Query::CityName(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Query::Postal(s) | Query::CityName(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in metres.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance::haversine(*self, *other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Opaque place identifier handed out by a search step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceCandidate {
    pub place_id: String,
}

impl PlaceCandidate {
    pub fn new(place_id: impl Into<String>) -> Self {
        Self { place_id: place_id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponent {
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Venue data returned by a successful detail lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetail {
    pub name: String,
    pub formatted_address: String,
    pub location: GeoPoint,
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryResult {
    pub name: String,
    pub formatted_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl LibraryResult {
    pub fn from_detail(detail: PlaceDetail) -> Self {
        let address = normalize(&detail.address_components);

        Self {
            name: detail.name,
            formatted_address: detail.formatted_address,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            lat: detail.location.lat,
            lng: detail.location.lng,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Expected "no data" outcomes of a search, each with a fixed user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyQuery,
    InvalidPostalCode,
    NoLibrariesNearPostalCode,
    InvalidCity,
    NoLibrariesInCity,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::EmptyQuery => "Empty query",
            Rejection::InvalidPostalCode => "Invalid pincode enter correct pincode",
            Rejection::NoLibrariesNearPostalCode => "No libraries found near this ZIP",
            Rejection::InvalidCity => "Invalid city name",
            Rejection::NoLibrariesInCity => "No libraries found in this city",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a search. Serialized as `{ok, error?, results?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SearchEnvelope", try_from = "SearchEnvelope")]
pub enum SearchResponse {
    Ok(Vec<LibraryResult>),
    Error(String),
}

impl SearchResponse {
    pub fn error(message: impl Into<String>) -> Self {
        SearchResponse::Error(message.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SearchResponse::Ok(_))
    }

    pub fn results(&self) -> Option<&[LibraryResult]> {
        match self {
            SearchResponse::Ok(results) => Some(results),
            SearchResponse::Error(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SearchResponse::Ok(_) => None,
            SearchResponse::Error(message) => Some(message),
        }
    }
}

impl From<Rejection> for SearchResponse {
    fn from(rejection: Rejection) -> Self {
        SearchResponse::Error(rejection.message().to_string())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchEnvelope {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<Vec<LibraryResult>>,
}

impl From<SearchResponse> for SearchEnvelope {
    fn from(response: SearchResponse) -> Self {
        match response {
            SearchResponse::Ok(results) => Self { ok: true, error: None, results: Some(results) },
            SearchResponse::Error(message) => Self { ok: false, error: Some(message), results: None },
        }
    }
}

impl TryFrom<SearchEnvelope> for SearchResponse {
    type Error = String;

    fn try_from(envelope: SearchEnvelope) -> Result<Self, String> {
        match envelope {
            SearchEnvelope { ok: true, error: None, results: Some(results) } => {
                Ok(SearchResponse::Ok(results))
            }
            SearchEnvelope { ok: false, error: Some(message), results: None } => {
                Ok(SearchResponse::Error(message))
            }
            _ => Err("search response must carry exactly one of `results` (ok) or `error`".into()),
        }
    }
}
