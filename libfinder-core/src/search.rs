//! Query classification and the two search strategies.
//!
//! Postal codes go through a nearby search around the geocoded point, keep
//! exact postal-code matches, and fall back to the single nearest venue.
//! City names go through a text search and return every venue found.

use futures::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;

use crate::{
    Config,
    error::Result,
    model::{GeoPoint, LibraryResult, PlaceCandidate, PlaceDetail, Query, Rejection, SearchResponse},
    provider::{PlacesProvider, provider_from_config},
};

/// Radius of the nearby search around a geocoded postal code.
pub const NEARBY_RADIUS_M: u32 = 12_000;
pub const LIBRARY_CATEGORY: &str = "library";
pub const CITY_QUERY_PREFIX: &str = "libraries in ";
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct LibraryFinder {
    provider: Arc<dyn PlacesProvider>,
    detail_concurrency: usize,
}

impl LibraryFinder {
    pub fn new(provider: Arc<dyn PlacesProvider>) -> Self {
        Self { provider, detail_concurrency: DEFAULT_DETAIL_CONCURRENCY }
    }

    pub fn with_detail_concurrency(mut self, limit: usize) -> Self {
        self.detail_concurrency = limit.max(1);
        self
    }

    /// Build a finder backed by the provider described in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(provider).with_detail_concurrency(config.detail_concurrency))
    }

    /// Resolve a postal code or city name to libraries.
    ///
    /// `Ok(SearchResponse::Error(..))` is an expected "nothing found" outcome.
    /// `Err` means an upstream call failed outright.
    pub async fn search(&self, raw: &str) -> Result<SearchResponse> {
        let Some(query) = Query::classify(raw) else {
            return Ok(Rejection::EmptyQuery.into());
        };

        match query {
            Query::Postal(zip) => self.search_by_postal_code(&zip).await,
            Query::CityName(city) => self.search_by_city(&city).await,
        }
    }

    async fn search_by_postal_code(&self, zip: &str) -> Result<SearchResponse> {
        tracing::info!(zip, "searching libraries by postal code");

        let Some(center) = self.provider.geocode(zip).await? else {
            return Ok(Rejection::InvalidPostalCode.into());
        };

        let candidates =
            self.provider.nearby_search(center, NEARBY_RADIUS_M, LIBRARY_CATEGORY).await?;
        if candidates.is_empty() {
            return Ok(Rejection::NoLibrariesNearPostalCode.into());
        }

        let pool = self.resolve_candidates(candidates).await?;

        Ok(match select_for_postal_code(zip, center, pool) {
            Some(results) => SearchResponse::Ok(results),
            None => Rejection::NoLibrariesNearPostalCode.into(),
        })
    }

    async fn search_by_city(&self, city: &str) -> Result<SearchResponse> {
        tracing::info!(city, "searching libraries by city");

        // Only a validity check; the coordinates are not used.
        if self.provider.geocode(city).await?.is_none() {
            return Ok(Rejection::InvalidCity.into());
        }

        let text = format!("{CITY_QUERY_PREFIX}{city}");
        let candidates = self.provider.text_search(&text, LIBRARY_CATEGORY).await?;
        if candidates.is_empty() {
            return Ok(Rejection::NoLibrariesInCity.into());
        }

        let results = self.resolve_candidates(candidates).await?;
        Ok(SearchResponse::Ok(results))
    }

    /// Fetch detail for every candidate concurrently, drop the ones without
    /// usable detail, and return the rest in candidate order.
    async fn resolve_candidates(&self, candidates: Vec<PlaceCandidate>) -> Result<Vec<LibraryResult>> {
        let provider = self.provider.as_ref();
        let total = candidates.len();

        let mut fetched: Vec<(usize, Option<PlaceDetail>)> =
            stream::iter(candidates.into_iter().enumerate())
                .map(move |(index, candidate)| async move {
                    provider.place_details(&candidate).await.map(|detail| (index, detail))
                })
                .buffer_unordered(self.detail_concurrency)
                .try_collect()
                .await?;

        fetched.sort_by_key(|(index, _)| *index);

        let results: Vec<LibraryResult> = fetched
            .into_iter()
            .filter_map(|(_, detail)| detail)
            .map(LibraryResult::from_detail)
            .collect();

        tracing::debug!(candidates = total, kept = results.len(), "resolved place details");
        Ok(results)
    }
}

/// Exact postal-code matches if there are any, otherwise the nearest venue.
///
/// Returns `None` only when `pool` is empty.
pub fn select_for_postal_code(
    zip: &str,
    center: GeoPoint,
    pool: Vec<LibraryResult>,
) -> Option<Vec<LibraryResult>> {
    let exact: Vec<LibraryResult> =
        pool.iter().filter(|r| r.postal_code.as_deref() == Some(zip)).cloned().collect();

    if !exact.is_empty() {
        return Some(exact);
    }

    nearest(center, pool).map(|r| vec![r])
}

/// The closest result to `center`. Equidistant results resolve to the earliest one.
pub fn nearest(center: GeoPoint, pool: Vec<LibraryResult>) -> Option<LibraryResult> {
    pool.into_iter()
        .map(|r| (center.distance_to(&r.location()), r))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, r)| r)
}
