use crate::{
    Config,
    error::Result,
    model::{GeoPoint, PlaceCandidate, PlaceDetail},
    provider::google::GooglePlacesProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod google;

/// The three upstream lookups a search is composed of.
///
/// Implementations report "nothing there" through `None` or an empty list and
/// reserve `Err` for transport and parsing failures.
#[async_trait]
pub trait PlacesProvider: Send + Sync + Debug {
    /// Resolve free text to the first matching point.
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>>;

    async fn nearby_search(
        &self,
        center: GeoPoint,
        radius_m: u32,
        category: &str,
    ) -> Result<Vec<PlaceCandidate>>;

    async fn text_search(&self, query: &str, category: &str) -> Result<Vec<PlaceCandidate>>;

    /// `None` when the upstream did not return usable detail for this place.
    async fn place_details(&self, candidate: &PlaceCandidate) -> Result<Option<PlaceDetail>>;
}

/// Construct the Google provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn PlacesProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No Google API key configured.\n\
             Hint: run `libfinder configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = GooglePlacesProvider::with_base_url(
        api_key.to_owned(),
        config.api_base_url.clone(),
        config.request_timeout(),
    )?;

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No Google API key configured"));
        assert!(msg.contains("Hint: run `libfinder configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
